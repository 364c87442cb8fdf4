//! Benchmark tests for the scan scheduler

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use sweep::engine::{Engine, Hooks};
use sweep::error::Result;
use sweep::unit::fs::scan_children;
use sweep::unit::{Category, Registry, ScanResult, Unit};
use tempfile::TempDir;

/// Unit that itemizes one directory tree.
struct TreeUnit {
    id: String,
    dir: PathBuf,
}

impl Unit for TreeUnit {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Benchmark tree"
    }

    fn category(&self) -> Category {
        Category::User
    }

    fn scan(&self) -> Result<ScanResult> {
        Ok(scan_children(&self.id, &self.id, &self.dir, "Entry"))
    }
}

/// Create one directory per unit, each with `files` files spread over 10 subdirectories
fn create_trees(units: usize, files: usize) -> (TempDir, Registry) {
    let root = TempDir::new().unwrap();
    let mut registry = Registry::new();

    for u in 0..units {
        let dir = root.path().join(format!("unit{}", u));
        for f in 0..files {
            let subdir = dir.join(format!("dir{}", f % 10));
            fs::create_dir_all(&subdir).unwrap();
            let mut file = File::create(subdir.join(format!("file{}.bin", f))).unwrap();
            file.write_all(&[b'x'; 1024]).unwrap();
        }
        registry.register(Arc::new(TreeUnit {
            id: format!("unit{}", u),
            dir,
        }));
    }

    (root, registry)
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for units in [1, 4, 8].iter() {
        let (_root, registry) = create_trees(*units, 500);
        let registry = Arc::new(registry);

        let sequential = Engine::new(Arc::clone(&registry)).with_max_workers(1);
        let pooled = Engine::new(Arc::clone(&registry));

        group.bench_with_input(BenchmarkId::new("one_worker", units), units, |b, _| {
            b.iter(|| black_box(sequential.scan(None, None, &Hooks::new())))
        });

        group.bench_with_input(BenchmarkId::new("four_workers", units), units, |b, _| {
            b.iter(|| black_box(pooled.scan(None, None, &Hooks::new())))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scan);
criterion_main!(benches);

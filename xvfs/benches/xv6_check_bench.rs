use std::io::Write;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use xvfs::xv6::*;

/// 200 inodes spread over nested directories, half of the files large
/// enough to need an indirect block.
fn populated_image() -> Vec<u8> {
    let mut b = Xv6ImageBuilder::new(256, 8192).unwrap();
    for d in 0..10 {
        let dir = b.add_dir(XV6_ROOT_INODE, &format!("dir{d}")).unwrap();
        for f in 0..19 {
            let blocks = if f % 2 == 0 { 2 } else { XV6_NDIRECT + 20 };
            b.add_file(dir, &format!("f{f}"), blocks).unwrap();
        }
    }
    b.into_bytes()
}

fn bench_xv6_check(c: &mut Criterion) {
    let img = populated_image();
    let mut group = c.benchmark_group("xv6_check");
    group.throughput(Throughput::Bytes(img.len() as u64));

    group.bench_function("check_populated_mem", |b| {
        b.iter(|| {
            let mut io = MemXvIO::new(&img);
            check_image(&mut io).unwrap();
        });
    });

    group.bench_function("check_populated_disk", |b| {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&img).unwrap();
        b.iter(|| {
            let mut io = StdXvIO::new(&mut file);
            check_image(&mut io).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_xv6_check);
criterion_main!(benches);

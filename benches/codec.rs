use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use logue_sysex::module::{Module, ModuleManifest};
use logue_sysex::protocol::{MessageType, build_request, parse_response, seven_bit};

const MANIFEST: &str = r#"{"header": {"platform": "prologue", "module": "osc", "api": "1.2-3",
    "dev_id": 8, "prg_id": 9, "version": "5.6-7", "name": "waves", "num_param": 2,
    "params": [["Wave A", 0, 45, ""], ["Sub Mix", 0, 100, "%"]]}}"#;

fn binary(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 37 % 256) as u8).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("seven_bit");

    // One prologue program (336 bytes)
    let program = binary(336);
    group.throughput(Throughput::Bytes(336));
    group.bench_function("encode_program", |b| {
        b.iter(|| {
            black_box(seven_bit::encode(&program));
        });
    });

    // A user module image (32 KB)
    let module = binary(32 * 1024);
    group.throughput(Throughput::Bytes(32 * 1024));
    group.bench_function("encode_32kb", |b| {
        b.iter(|| {
            black_box(seven_bit::encode(&module));
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("seven_bit");

    let program = seven_bit::encode(&binary(336));
    group.throughput(Throughput::Bytes(336));
    group.bench_function("decode_program", |b| {
        b.iter(|| {
            black_box(seven_bit::decode(&program).unwrap());
        });
    });

    let module = seven_bit::encode(&binary(32 * 1024));
    group.throughput(Throughput::Bytes(32 * 1024));
    group.bench_function("decode_32kb", |b| {
        b.iter(|| {
            black_box(seven_bit::decode(&module).unwrap());
        });
    });

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    let body = [&[0x73, 0x03][..], &seven_bit::encode(&binary(336))[..]].concat();
    group.bench_function("build_program_dump", |b| {
        b.iter(|| {
            black_box(build_request(0x4B, 1, MessageType::ProgramDataDump, &body).unwrap());
        });
    });

    let frame = build_request(0x4B, 1, MessageType::ProgramDataDump, &body).unwrap();
    group.bench_function("parse_program_dump", |b| {
        b.iter(|| {
            black_box(parse_response(frame.clone()).unwrap());
        });
    });

    group.finish();
}

fn bench_module(c: &mut Criterion) {
    let mut group = c.benchmark_group("module");

    let manifest = ModuleManifest::from_json(MANIFEST).unwrap();
    let payload = binary(16 * 1024);
    group.throughput(Throughput::Bytes(16 * 1024));
    group.bench_function("build_sealed_16kb", |b| {
        b.iter(|| {
            black_box(manifest.build_module(&payload).unwrap());
        });
    });

    let (_, module) = manifest.build_module(&payload).unwrap();
    let bytes = module.to_bytes();
    group.bench_function("parse_16kb", |b| {
        b.iter(|| {
            black_box(Module::from_bytes(&bytes).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_frame, bench_module);
criterion_main!(benches);

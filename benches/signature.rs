use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sha256_lamport_signatures::{generate_key_pair, Blake3, KeyPair};

fn criterion_benchmark(c: &mut Criterion) {
    let to_sign = vec![0u8; 1000000];
    let to_sign: &[u8] = &to_sign;

    c.bench_function("keygen", |b| b.iter(|| generate_key_pair().unwrap()));

    let key_pair = generate_key_pair().unwrap();
    c.bench_function("signature", |b| {
        b.iter(|| key_pair.sign(black_box(to_sign)))
    });

    let signature = key_pair.sign(to_sign);
    c.bench_function("verify", |b| {
        b.iter(|| key_pair.public_key().verify(black_box(to_sign), &signature))
    });

    let blake3_pair = KeyPair::<Blake3>::generate().unwrap();
    let blake3_signature = blake3_pair.sign(to_sign);
    c.bench_function("verify_blake3", |b| {
        b.iter(|| {
            blake3_pair
                .public_key()
                .verify(black_box(to_sign), &blake3_signature)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use paseto4::{LocalKey, SecretKey};
use rand_core::OsRng;

const PAYLOAD: &[u8] = b"{\"data\":\"this is a signed message\",\"exp\":\"2022-01-01T00:00:00+00:00\"}";
const FOOTER: &[u8] = b"{\"kid\":\"zVhMiPBP9fRf2snEcT7gFTioeA9COcNy9DfgL1W60haN\"}";
const IMPLICIT: &[u8] = b"{\"test-vector\":\"bench\"}";

pub fn criterion_benchmark(c: &mut Criterion) {
    let key = LocalKey::random(&mut OsRng).unwrap();
    let sealed = key.encrypt(&mut OsRng, PAYLOAD, FOOTER, IMPLICIT).unwrap();

    c.bench_function("encrypt", |b| {
        b.iter(|| {
            key.encrypt(&mut OsRng, black_box(PAYLOAD), FOOTER, IMPLICIT)
                .unwrap()
        })
    });

    c.bench_function("decrypt", |b| {
        b.iter(|| key.decrypt(black_box(&sealed), FOOTER, IMPLICIT).unwrap())
    });

    let secret_key = SecretKey::random(&mut OsRng).unwrap();
    let public_key = secret_key.public_key();
    let signed = secret_key.sign(PAYLOAD, FOOTER, IMPLICIT).unwrap();

    c.bench_function("sign", |b| {
        b.iter(|| secret_key.sign(black_box(PAYLOAD), FOOTER, IMPLICIT).unwrap())
    });

    c.bench_function("verify", |b| {
        b.iter(|| {
            public_key
                .verify(black_box(&signed), FOOTER, IMPLICIT)
                .unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

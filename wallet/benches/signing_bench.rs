// Derivation & signing benchmarks for the DCL wallet.
//
// SLH-DSA-SHA2-256f signing is the slow step of every send; these numbers
// show how long a user waits between confirming and broadcasting.

use criterion::{criterion_group, criterion_main, Criterion};

use dcl_wallet::config::SYSTEM_PROGRAM_ADDRESS;
use dcl_wallet::crypto::sha256;
use dcl_wallet::identity::{derive_identity, DerivationSeed};
use dcl_wallet::transaction::{
    pad_message, sign_transaction, verify_signed_transaction, MessageEncoding, TransactionIntent,
};

const PHRASE: &str = "apple apple apple apple apple apple apple apple apple apple apple apple";

fn bench_seed_derivation(c: &mut Criterion) {
    c.bench_function("identity/derive_seed", |b| {
        b.iter(|| DerivationSeed::derive(PHRASE));
    });
}

fn bench_keypair_derivation(c: &mut Criterion) {
    c.bench_function("slh-dsa/derive_identity", |b| {
        b.iter(|| derive_identity(PHRASE));
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let keypair = derive_identity(PHRASE);
    let intent = TransactionIntent::new(keypair.address(), SYSTEM_PROGRAM_ADDRESS, 5.0, "DCL");

    let mut group = c.benchmark_group("slh-dsa");
    group.sample_size(10);
    group.bench_function("sign_transaction", |b| {
        b.iter(|| sign_transaction(&keypair, &intent, MessageEncoding::DigestList));
    });

    let signed = sign_transaction(&keypair, &intent, MessageEncoding::DigestList)
        .expect("signing succeeds");
    let address = keypair.address();
    group.bench_function("verify_transaction", |b| {
        b.iter(|| verify_signed_transaction(&address, &signed));
    });
    group.finish();
}

fn bench_message_prep(c: &mut Criterion) {
    let message = b"12,255,0,33,7,190,64,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17,18,19,20,21,22,23,24,25";

    c.bench_function("message/hash_and_pad", |b| {
        b.iter(|| {
            let _ = sha256(message);
            pad_message(message)
        });
    });
}

criterion_group!(
    benches,
    bench_seed_derivation,
    bench_keypair_derivation,
    bench_sign_transaction,
    bench_message_prep,
);
criterion_main!(benches);

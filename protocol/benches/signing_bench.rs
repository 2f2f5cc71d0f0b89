// Encoding & signing benchmarks for the PULSAR wire model.
//
// Covers transaction encoding, signature-payload hashing, envelope
// signing, and envelope decoding at various operation counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pulsar_protocol::account::AccountId;
use pulsar_protocol::crypto::keys::PulsarKeypair;
use pulsar_protocol::transaction::{
    Asset, Network, Operation, TaggedTransaction, Transaction, TransactionEnvelope,
    TransactionSignaturePayload,
};
use pulsar_protocol::xdr::{XdrDecode, XdrEncode};

fn sample_tx(keypair: &PulsarKeypair, op_count: usize) -> Transaction {
    let dest = AccountId::from_bytes([2u8; 32]);
    let mut tx = Transaction::new(keypair, 42);
    for _ in 0..op_count {
        tx = tx
            .with_operation(Operation::payment(dest, Asset::native(), 1_000))
            .unwrap();
    }
    tx
}

fn bench_encode_transaction(c: &mut Criterion) {
    let keypair = PulsarKeypair::from_seed(&[1u8; 32]);
    let mut group = c.benchmark_group("xdr/encode_transaction");
    for op_count in [1usize, 10, 100] {
        let tx = sample_tx(&keypair, op_count);
        group.throughput(Throughput::Elements(op_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(op_count), &tx, |b, tx| {
            b.iter(|| tx.to_xdr());
        });
    }
    group.finish();
}

fn bench_payload_hash(c: &mut Criterion) {
    let keypair = PulsarKeypair::from_seed(&[1u8; 32]);
    let tx = sample_tx(&keypair, 10);
    let network = Network::testnet();

    c.bench_function("signing/payload_hash", |b| {
        b.iter(|| {
            TransactionSignaturePayload::new(
                &network,
                TaggedTransaction::wrap_transaction(tx.clone()),
            )
            .hash()
        });
    });
}

fn bench_sign_envelope(c: &mut Criterion) {
    let keypair = PulsarKeypair::from_seed(&[1u8; 32]);
    let tx = sample_tx(&keypair, 10);
    let network = Network::testnet();

    c.bench_function("signing/sign_envelope", |b| {
        b.iter(|| {
            let mut envelope = TransactionEnvelope::for_transaction(tx.clone());
            envelope.sign(&network, &keypair).unwrap();
            envelope
        });
    });
}

fn bench_decode_envelope(c: &mut Criterion) {
    let keypair = PulsarKeypair::from_seed(&[1u8; 32]);
    let network = Network::testnet();
    let mut envelope = TransactionEnvelope::for_transaction(sample_tx(&keypair, 10));
    envelope.sign(&network, &keypair).unwrap();
    let wire = envelope.to_xdr();

    c.bench_function("xdr/decode_envelope", |b| {
        b.iter(|| TransactionEnvelope::from_xdr(&wire).unwrap());
    });
}

criterion_group!(
    benches,
    bench_encode_transaction,
    bench_payload_hash,
    bench_sign_envelope,
    bench_decode_envelope
);
criterion_main!(benches);

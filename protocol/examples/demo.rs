//! A tour of the PULSAR wire model: assemble, sign, encode, interpret.
//!
//! Run with: `cargo run --example demo`

use pulsar_protocol::account::AccountId;
use pulsar_protocol::crypto::keys::PulsarKeypair;
use pulsar_protocol::transaction::{
    Asset, FeeBumpTransaction, Memo, Network, Operation, Preconditions, Transaction,
    TransactionEnvelope,
};
use pulsar_protocol::xdr::XdrEncode;

fn main() {
    let network = Network::testnet();

    // Two parties: a sender with a keypair, a receiver known by address.
    let sender = PulsarKeypair::generate();
    let receiver = AccountId::from_bytes([2u8; 32]);
    println!("sender   : {}", AccountId::from(&sender));
    println!("receiver : {}", receiver);

    // Assemble a payment. The fee floor tracks the operation count and
    // preconditions promote to the structured form on first contact.
    let tx = Transaction::new(&sender, 1)
        .with_memo(Memo::text("demo payment").unwrap())
        .with_preconditions(Preconditions::default())
        .with_operation(Operation::payment(receiver, Asset::native(), 25_000))
        .unwrap();
    println!("fee      : {}", tx.fee());
    println!("threshold: {:?}", tx.operation_threshold());

    // Sign and encode.
    let mut envelope = TransactionEnvelope::for_transaction(tx);
    envelope.sign(&network, &sender).expect("signature slot free");
    let wire = envelope.to_xdr();
    println!("tx hash  : {}", hex::encode(envelope.hash(&network)));
    println!("wire     : {} bytes", wire.len());

    // A sponsor pushes the same transaction with a higher fee.
    let sponsor = PulsarKeypair::generate();
    let bump = FeeBumpTransaction::wrapping(&envelope, 1_000, &sponsor)
        .expect("current-shape envelope");
    bump.check_fee_covers_inner().expect("fee covers inner");
    let mut bump_envelope = TransactionEnvelope::for_fee_bump(bump);
    bump_envelope
        .sign(&network, &sponsor)
        .expect("signature slot free");
    println!("bump hash: {}", hex::encode(bump_envelope.hash(&network)));
}

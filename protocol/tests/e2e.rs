//! End-to-end tests for the PULSAR wire model.
//!
//! These exercise the full submission-side flow the way a client would
//! drive it: assemble a transaction, set preconditions, compose the
//! signature payload for a network, sign, enclose in an envelope, encode
//! to wire bytes, and decode the result that a validator would send back.
//! Each test stands alone; there is no shared state anywhere in the
//! crate, so nothing needs setup or teardown.

use pulsar_protocol::account::{AccountId, MuxedAccount, SignerKey};
use pulsar_protocol::config::MIN_OPERATION_FEE;
use pulsar_protocol::crypto::keys::PulsarKeypair;
use pulsar_protocol::transaction::{
    Asset, FeeBumpTransaction, Memo, Network, Operation, Preconditions, TaggedTransaction,
    Threshold, TimeBounds, Transaction, TransactionEnvelope, TransactionResult,
    TransactionSignaturePayload, TransactionV0,
};
use pulsar_protocol::transaction::result::{
    InnerTransactionResult, InnerTransactionResultPair, InnerTransactionResultResult,
    OperationResult, OperationResultTr, PaymentResult, TransactionResultResult,
};
use pulsar_protocol::xdr::{ExtensionPoint, XdrDecode, XdrEncode};

fn sender() -> PulsarKeypair {
    PulsarKeypair::from_seed(&[7u8; 32])
}

fn receiver() -> AccountId {
    AccountId::from_bytes([2u8; 32])
}

#[test]
fn assemble_sign_encode_decode_full_cycle() {
    let kp = sender();
    let network = Network::testnet();

    let tx = Transaction::new(&kp, 5)
        .with_memo(Memo::text("coffee").unwrap())
        .with_preconditions(
            Preconditions::none()
                .with_min_time(1_700_000_000)
                .with_max_time(1_700_003_600),
        )
        .with_operation(Operation::payment(receiver(), Asset::native(), 10_000))
        .unwrap();

    let mut envelope = TransactionEnvelope::for_transaction(tx.clone());
    envelope.sign(&network, &kp).unwrap();

    let wire = envelope.to_xdr();
    let decoded = TransactionEnvelope::from_xdr(&wire).unwrap();
    assert_eq!(decoded, envelope);

    match decoded {
        TransactionEnvelope::Tx(env) => {
            assert_eq!(env.tx, tx);
            assert_eq!(env.signatures.len(), 1);
            assert_eq!(env.signatures[0].hint, kp.public_key().signature_hint());
        }
        other => panic!("expected a current-shape envelope, got {other:?}"),
    }
}

#[test]
fn fee_floor_holds_through_the_whole_flow() {
    let kp = sender();
    let mut tx = Transaction::new(&kp, 1);
    for n in 1..=5u32 {
        tx = tx
            .with_operation(Operation::payment(receiver(), Asset::native(), 100))
            .unwrap();
        assert!(tx.fee() >= n * MIN_OPERATION_FEE);
    }
    let decoded = Transaction::from_xdr(&tx.to_xdr()).unwrap();
    assert_eq!(decoded.fee(), 5 * MIN_OPERATION_FEE);
}

#[test]
fn threshold_derivation_over_a_mixed_transaction() {
    let kp = sender();
    let tx = Transaction::new(&kp, 1)
        .with_operation(Operation::bump_sequence(10))
        .unwrap()
        .with_operation(Operation::payment(receiver(), Asset::native(), 1))
        .unwrap()
        .with_operation(Operation::account_merge(receiver()))
        .unwrap();
    assert_eq!(tx.operation_threshold(), Some(Threshold::High));
}

#[test]
fn legacy_envelope_signs_identically_to_upgraded_envelope() {
    let kp = sender();
    let network = Network::testnet();
    let bounds = TimeBounds::new(100, 200);

    let v0 = TransactionV0::new(kp.public_key_bytes(), 9)
        .with_time_bounds(Some(bounds))
        .with_memo(Memo::id(4))
        .with_operation(Operation::payment(receiver(), Asset::native(), 77))
        .unwrap();

    let legacy = TransactionEnvelope::for_transaction_v0(v0.clone());
    let upgraded = TransactionEnvelope::for_transaction(v0.upgrade());

    assert_eq!(
        legacy.signature_payload(&network).to_bytes(),
        upgraded.signature_payload(&network).to_bytes()
    );
    assert_eq!(legacy.hash(&network), upgraded.hash(&network));

    // And the signature made over the legacy envelope verifies against
    // the upgraded envelope's hash.
    let mut signed = legacy;
    signed.sign(&network, &kp).unwrap();
    let sig = pulsar_protocol::crypto::keys::PulsarSignature::from_bytes(
        signed.signatures()[0].signature.as_slice().try_into().unwrap(),
    );
    assert!(kp.public_key().verify(&upgraded.hash(&network), &sig));
}

#[test]
fn fee_bump_flow() {
    let kp = sender();
    let sponsor = PulsarKeypair::from_seed(&[9u8; 32]);
    let network = Network::testnet();

    let tx = Transaction::new(&kp, 12)
        .with_operation(Operation::payment(receiver(), Asset::native(), 500))
        .unwrap();
    let mut inner_envelope = TransactionEnvelope::for_transaction(tx);
    inner_envelope.sign(&network, &kp).unwrap();

    let bump = FeeBumpTransaction::wrapping(&inner_envelope, 1_000, &sponsor).unwrap();
    assert!(bump.check_fee_covers_inner().is_ok());
    assert_eq!(*bump.fee_source(), MuxedAccount::from(&sponsor));

    let mut bump_envelope = TransactionEnvelope::for_fee_bump(bump);
    bump_envelope.sign(&network, &sponsor).unwrap();

    let decoded = TransactionEnvelope::from_xdr(&bump_envelope.to_xdr()).unwrap();
    assert_eq!(decoded, bump_envelope);

    // The fee-bump payload is tagged differently from the inner payload.
    assert_ne!(bump_envelope.hash(&network), inner_envelope.hash(&network));
}

#[test]
fn fee_bump_rejects_legacy_envelope() {
    let kp = sender();
    let v0 = TransactionV0::new(kp.public_key_bytes(), 9);
    let legacy = TransactionEnvelope::for_transaction_v0(v0);
    assert!(FeeBumpTransaction::wrapping(&legacy, 1_000, &kp).is_err());
}

#[test]
fn precondition_promotion_survives_the_wire() {
    let kp = sender();
    let signer = SignerKey::Ed25519([3u8; 32]);
    let preconditions = Preconditions::wrap_time_bounds(Some(TimeBounds::new(10, 20)))
        .with_min_seq_age(3600)
        .with_extra_signers(vec![signer.clone()])
        .unwrap();

    let tx = Transaction::new(&kp, 2)
        .with_preconditions(preconditions)
        .with_operation(Operation::bump_sequence(50))
        .unwrap();

    let decoded = Transaction::from_xdr(&tx.to_xdr()).unwrap();
    let p = decoded.preconditions();
    assert_eq!(p.time_bounds(), Some(&TimeBounds::new(10, 20)));
    assert_eq!(p.min_seq_age(), 3600);
    assert_eq!(p.extra_signers(), &[signer]);
}

#[test]
fn result_decoding_end_to_end() {
    // A validator-side success result for a one-payment transaction.
    let result = TransactionResult {
        fee_charged: 100,
        result: TransactionResultResult::Success(vec![OperationResult::Inner(
            OperationResultTr::Payment(PaymentResult::Success),
        )]),
        ext: ExtensionPoint::V0,
    };
    let decoded = TransactionResult::from_xdr(&result.to_xdr()).unwrap();
    assert!(decoded.was_successful());
    assert_eq!(decoded.error_code(), None);
    assert_eq!(decoded.result.op_results().unwrap().len(), 1);

    // A fee-bump failure wrapping an inner bad_seq.
    let failed = TransactionResult {
        fee_charged: 1_000,
        result: TransactionResultResult::FeeBumpInnerFailed(InnerTransactionResultPair {
            transaction_hash: [5u8; 32],
            result: InnerTransactionResult {
                fee_charged: 100,
                result: InnerTransactionResultResult::BadSeq,
                ext: ExtensionPoint::V0,
            },
        }),
        ext: ExtensionPoint::V0,
    };
    let decoded = TransactionResult::from_xdr(&failed.to_xdr()).unwrap();
    assert!(decoded.was_not_successful());
    assert_eq!(decoded.error_code(), Some("fee_bump_inner_failed"));
    let pair = decoded.result.inner_result_pair().unwrap();
    assert_eq!(pair.result.result.code().error_code(), Some("bad_seq"));
}

#[test]
fn payload_composition_matches_envelope_hash() {
    let kp = sender();
    let network = Network::mainnet();
    let tx = Transaction::new(&kp, 3)
        .with_operation(Operation::payment(receiver(), Asset::native(), 1))
        .unwrap();

    let payload = TransactionSignaturePayload::new(
        &network,
        TaggedTransaction::wrap_transaction(tx.clone()),
    );
    let envelope = TransactionEnvelope::for_transaction(tx);
    assert_eq!(payload.hash(), envelope.hash(&network));
    assert_eq!(&payload.to_bytes()[..32], &network.id());
}

#[test]
fn model_values_serialize_to_json() {
    // The wire format is XDR, but API surfaces report these values as
    // JSON; the serde derives must stay in sync with the model.
    let kp = sender();
    let tx = Transaction::new(&kp, 8)
        .with_memo(Memo::id(3))
        .with_operation(Operation::payment(receiver(), Asset::native(), 42))
        .unwrap();
    let json = serde_json::to_string(&tx).unwrap();
    let back: Transaction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tx);

    let result = TransactionResult {
        fee_charged: 100,
        result: TransactionResultResult::BadSeq,
        ext: ExtensionPoint::V0,
    };
    let json = serde_json::to_string(&result).unwrap();
    let back: TransactionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn addresses_survive_a_display_parse_cycle() {
    let kp = sender();
    let account = AccountId::from(&kp);
    let addr = account.to_address();
    assert!(addr.starts_with("pulsar1"));
    assert_eq!(AccountId::from_address(&addr).unwrap(), account);
}

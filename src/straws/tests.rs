use crate::straws::checks::{has_opcode, is};
use crate::straws::catalog;
use crate::straws::jettons::{JettonMint, JettonTransfer};
use crate::{
    Account, AccountId, Action, ActionKind, Bath, Bubble, BubbleId, BuildError, CollectingSink, EncryptedComment,
    Forest, Merger, MsgBody, NoopSink, Options, Payload, PayloadKind, Straw, TxRecord, find_actions_with,
};

fn addr(n: u8) -> AccountId {
    AccountId::new(0, [n; 32])
}

fn tx(account: u8, body: Option<MsgBody>, success: bool) -> TxRecord {
    TxRecord {
        account: Account::new(addr(account)),
        op_code: body.as_ref().and_then(|b| b.op().opcode()),
        decoded_body: body,
        success,
        ..Default::default()
    }
}

fn mint_root(master: u8, success: bool) -> TxRecord {
    TxRecord { op_code: Some(0xb56b_9598), ..tx(master, None, success) }
}

fn internal(wallet: u8, amount: u128, success: bool) -> TxRecord {
    let body =
        MsgBody::JettonInternalTransfer { query_id: 0, amount, from: None, response_address: None, forward_ton_amount: 0 };
    tx(wallet, Some(body), success)
}

fn notify(owner: u8, forward_payload: Option<MsgBody>, success: bool) -> TxRecord {
    let body = MsgBody::JettonNotify { query_id: 0, amount: 0, sender: None, forward_payload: forward_payload.map(Box::new) };
    tx(owner, Some(body), success)
}

fn excess(owner: u8) -> TxRecord {
    tx(owner, Some(MsgBody::Excess { query_id: 0 }), true)
}

fn transfer_root(wallet: u8, owner: u8, destination: u8, amount: u128, note: Option<MsgBody>) -> TxRecord {
    let body = MsgBody::JettonTransfer {
        query_id: 0,
        amount,
        destination: addr(destination),
        response_destination: Some(addr(owner)),
        forward_ton_amount: 1,
        forward_payload: note.map(Box::new),
    };
    TxRecord {
        input_from: Some(Account::new(addr(owner))),
        jetton_master: Some(addr(99)),
        ..tx(wallet, Some(body), true)
    }
}

fn run(forest: Forest) -> Vec<Action> {
    find_actions_with(forest, &catalog(), &Options::default(), &NoopSink).actions
}

/// master -> internal transfer -> notify
fn mint_chain(forest: &mut Forest, parent: Option<BubbleId>, successes: [bool; 3]) -> BubbleId {
    let root = match parent {
        Some(parent) => forest.add_child(parent, Bubble::from_tx(mint_root(1, successes[0]))).unwrap(),
        None => forest.add_root(Bubble::from_tx(mint_root(1, successes[0]))),
    };
    let wallet = forest.add_child(root, Bubble::from_tx(internal(2, 1000, successes[1]))).unwrap();
    forest.add_child(wallet, Bubble::from_tx(notify(3, None, successes[2]))).unwrap();
    root
}

#[test]
fn mint_with_notification_becomes_one_action() {
    let mut forest = Forest::new();
    mint_chain(&mut forest, None, [true; 3]);

    let actions = run(forest);
    assert_eq!(actions.len(), 1);
    let action = &actions[0];
    assert_eq!(action.kind, ActionKind::JettonMint);
    assert!(action.success);

    let mint = action.jetton_mint.as_ref().unwrap();
    assert_eq!(mint.amount, 1000);
    assert_eq!(mint.jetton, addr(1));
    assert_eq!(mint.recipients_wallet, addr(2));
    assert_eq!(mint.recipient, addr(3));
}

#[test]
fn mint_success_requires_every_level() {
    for failing in 0..3 {
        let mut successes = [true; 3];
        successes[failing] = false;
        let mut forest = Forest::new();
        mint_chain(&mut forest, None, successes);

        let actions = run(forest);
        assert_eq!(actions.len(), 1);
        assert!(!actions[0].success, "level {failing} failed but the mint succeeded");
    }
}

#[test]
fn mint_without_notification_keeps_zero_recipient() {
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(mint_root(1, true)));
    let wallet = forest.add_child(root, Bubble::from_tx(internal(2, 7, true))).unwrap();
    forest.add_child(wallet, Bubble::from_tx(excess(1))).unwrap();

    let actions = run(forest);
    assert_eq!(actions.len(), 1);
    let mint = actions[0].jetton_mint.as_ref().unwrap();
    assert_eq!(mint.amount, 7);
    assert!(mint.recipient.is_zero());
}

#[test]
fn mint_without_internal_transfer_is_left_alone() {
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(mint_root(1, true)));
    forest.add_child(root, Bubble::from_tx(excess(1))).unwrap();

    assert!(run(forest).is_empty());
}

#[test]
fn transfer_with_text_comment() {
    let mut forest = Forest::new();
    let comment = MsgBody::TextComment { text: "for coffee".into() };
    let root = forest.add_root(Bubble::from_tx(transfer_root(10, 11, 12, 500, Some(comment.clone()))));
    let wallet = forest.add_child(root, Bubble::from_tx(internal(13, 500, true))).unwrap();
    forest.add_child(wallet, Bubble::from_tx(notify(12, Some(comment), true))).unwrap();
    forest.add_child(wallet, Bubble::from_tx(excess(11))).unwrap();

    let actions = run(forest);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ActionKind::JettonTransfer);
    assert!(actions[0].success);

    let transfer = actions[0].jetton_transfer.as_ref().unwrap();
    assert_eq!(transfer.jetton, addr(99));
    assert_eq!(transfer.amount, 500);
    assert_eq!(transfer.sender, Some(addr(11)));
    assert_eq!(transfer.recipient, Some(addr(12)));
    assert_eq!(transfer.senders_wallet, addr(10));
    assert_eq!(transfer.recipients_wallet, addr(13));
    assert_eq!(transfer.comment.as_deref(), Some("for coffee"));
    assert!(transfer.encrypted_comment.is_none());
}

#[test]
fn transfer_takes_encrypted_note_from_notification() {
    let blob = EncryptedComment { encryption_type: "simple".into(), cipher_text: vec![0xde, 0xad] };
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(transfer_root(10, 11, 12, 1, None)));
    let wallet = forest.add_child(root, Bubble::from_tx(internal(13, 1, true))).unwrap();
    forest.add_child(wallet, Bubble::from_tx(notify(12, Some(MsgBody::EncryptedComment(blob.clone())), true))).unwrap();

    let actions = run(forest);
    let transfer = actions[0].jetton_transfer.as_ref().unwrap();
    assert!(transfer.comment.is_none());
    assert_eq!(transfer.encrypted_comment, Some(blob));
}

#[test]
fn failed_internal_transfer_fails_the_transfer() {
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(transfer_root(10, 11, 12, 1, None)));
    forest.add_child(root, Bubble::from_tx(internal(13, 1, false))).unwrap();

    let actions = run(forest);
    assert_eq!(actions.len(), 1);
    assert!(!actions[0].success);
    assert_eq!(actions[0].jetton_transfer.as_ref().unwrap().recipient, Some(addr(12)));
}

#[test]
fn transfer_without_any_master_is_reported_and_skipped() {
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(TxRecord { jetton_master: None, ..transfer_root(10, 11, 12, 1, None) }));
    forest.add_child(root, Bubble::from_tx(internal(13, 1, true))).unwrap();
    let before = forest.clone();

    let sink = CollectingSink::new();
    let run = Bath::new(forest, &catalog(), &Options::default()).run_with_metrics(&sink);

    assert!(run.actions.is_empty());
    assert_eq!(run.forest, before);
    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].data["straw"], "jetton transfer");
    assert!(reports[0].data["error"].contains("jetton master"));
}

#[test]
fn nested_mints_both_merge() {
    // outer mint whose notified recipient triggers another mint
    let mut forest = Forest::new();
    let outer = mint_chain(&mut forest, None, [true; 3]);
    let notify_id = forest.pre_order()[2];
    let inner = mint_chain(&mut forest, Some(notify_id), [true; 3]);

    let run = Bath::new(forest, &catalog(), &Options::default()).run_with_metrics(&NoopSink);

    assert_eq!(run.actions.len(), 2);
    assert!(run.actions.iter().all(|a| a.kind == ActionKind::JettonMint));
    assert_eq!(run.forest.len(), 2);
    assert_eq!(run.forest.children(outer), &[inner]);
    assert!(run.metrics.saturation.reached_fixpoint);
}

#[test]
fn straws_compose_across_passes() {
    // A straw that only matches once its child has become a transfer.
    let wrapper: Straw<JettonMint> = Straw {
        name: "wrapped transfer",
        checks: vec![has_opcode(0xabcd)],
        builder: None,
        children: vec![Straw {
            name: "wrapped transfer: inner",
            checks: vec![is(PayloadKind::JettonTransfer)],
            builder: Some(Box::new(|mint: &mut JettonMint, bubble: &Bubble| match &bubble.payload {
                Payload::JettonTransfer(JettonTransfer { amount, master, success, .. }) => {
                    mint.amount = *amount;
                    mint.master = *master;
                    mint.success = *success;
                    Ok(())
                }
                other => Err(BuildError::UnexpectedPayload { expected: PayloadKind::JettonTransfer, found: other.kind() }),
            })),
            children: Vec::new(),
            optional: false,
        }],
        optional: false,
    };

    let mut forest = Forest::new();
    let top = forest.add_root(Bubble::from_tx(TxRecord { op_code: Some(0xabcd), ..tx(50, None, true) }));
    let root = forest.add_child(top, Bubble::from_tx(transfer_root(10, 11, 12, 321, None))).unwrap();
    forest.add_child(root, Bubble::from_tx(internal(13, 321, true))).unwrap();

    let catalog = catalog();
    let mut with_wrapper: Vec<&dyn Merger> = vec![&wrapper as &dyn Merger];
    with_wrapper.extend(catalog.iter().copied());

    let run = Bath::new(forest, &with_wrapper, &Options::default()).run_with_metrics(&NoopSink);

    let passes: Vec<usize> = run.metrics.saturation.passes.iter().map(|p| p.merged).collect();
    assert_eq!(passes, vec![1, 1, 0]);
    assert_eq!(run.actions.len(), 1);
    let mint = run.actions[0].jetton_mint.as_ref().unwrap();
    assert_eq!(mint.amount, 321);
    assert_eq!(mint.jetton, addr(99));
}

#[test]
fn independent_forests_share_one_catalog_across_threads() {
    let catalog = catalog();
    let options = Options::default();

    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|copies| {
                let catalog = &catalog;
                let options = &options;
                scope.spawn(move || {
                    let mut forest = Forest::new();
                    for _ in 0..copies {
                        mint_chain(&mut forest, None, [true; 3]);
                    }
                    Bath::new(forest, catalog, options).run(&NoopSink).len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(counts, vec![1, 2, 3, 4]);
}

#[test]
fn unrelated_transactions_survive_untouched() {
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(tx(1, Some(MsgBody::TextComment { text: "hi".into() }), true)));
    forest.add_child(root, Bubble::from_tx(excess(2))).unwrap();
    let before = forest.clone();

    let run = Bath::new(forest, &catalog(), &Options::default()).run_with_metrics(&NoopSink);
    assert!(run.actions.is_empty());
    assert_eq!(run.forest, before);
}

#[test]
fn mint_participants_count_the_root_twice() {
    let mut forest = Forest::new();
    let root = mint_chain(&mut forest, None, [true; 3]);

    let run = Bath::new(forest, &catalog(), &Options::default()).run_with_metrics(&NoopSink);

    let merged = run.forest.get(root).unwrap();
    assert_eq!(merged.accounts, vec![addr(1), addr(1), addr(2), addr(3)]);
}

#[test]
fn extreme_amounts_merge_without_overflow() {
    let mut forest = Forest::new();
    let root = forest.add_root(Bubble::from_tx(TxRecord {
        input_amount: i64::MAX,
        input_from: Some(Account::new(addr(7))),
        ..mint_root(1, true)
    }));
    let drained = TxRecord { input_amount: i64::MIN, input_from: Some(Account::new(addr(1))), ..internal(2, 5, true) };
    let wallet = forest.add_child(root, Bubble::from_tx(drained)).unwrap();
    forest.add_child(wallet, Bubble::from_tx(TxRecord { input_amount: i64::MAX, ..excess(1) })).unwrap();

    let run = Bath::new(forest, &catalog(), &Options::default()).run_with_metrics(&NoopSink);

    assert_eq!(run.actions.len(), 1);
    let flow = &run.forest.get(root).unwrap().value_flow;
    assert_eq!(flow.accounts[&addr(1)].ton, i64::MAX);
}

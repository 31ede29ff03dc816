use std::cell::Cell;

use futures::executor::block_on;

use super::*;
use crate::fixtures::{RecordingEvents, RecordingPage, ScriptedTransport};

fn fields() -> FormFields {
    FormFields::from_pairs([
        ("templateId", "tpl-listrik"),
        ("amount", "150000"),
        ("description", "Bayar listrik Januari"),
        ("transactionDate", "2025-01-31"),
    ])
}

fn modal_page() -> RecordingPage {
    RecordingPage::new().with_dialog("quick-transaction-modal")
}

// =============================================================
// Display helpers
// =============================================================

#[test]
fn formatted_amount_empty_when_zero() {
    let mut form = QuickTransactionForm::default();
    assert_eq!(form.formatted_amount(), "");
    form.amount = 2_500_000;
    assert_eq!(form.formatted_amount(), "2.500.000");
}

#[test]
fn submit_button_text_follows_state() {
    let mut form = QuickTransactionForm::default();
    assert_eq!(form.submit_button_text(), "Simpan Draft");
    form.submitting = true;
    assert_eq!(form.submit_button_text(), "Menyimpan...");
}

#[test]
fn update_amount_rewrites_field() {
    let mut form = QuickTransactionForm::default();
    let mut field = String::from("Rp 1500000");
    form.update_amount(&mut field);
    assert_eq!(form.amount, 1_500_000);
    assert_eq!(field, "1.500.000");

    let mut field = String::from("abc");
    form.update_amount(&mut field);
    assert_eq!(form.amount, 0);
    assert_eq!(field, "");
}

#[test]
fn update_variable_fills_hidden_and_groups_display() {
    let form = QuickTransactionForm::default();
    let mut visible = String::from("1.250.000x");
    let mut hidden = String::new();
    form.update_variable(&mut visible, Some(&mut hidden));
    assert_eq!(hidden, "1250000");
    assert_eq!(visible, "1.250.000");
}

#[test]
fn update_variable_without_hidden_only_rewrites_display() {
    let form = QuickTransactionForm::default();
    let mut visible = String::from("--");
    form.update_variable(&mut visible, None);
    assert_eq!(visible, "");
}

#[test]
fn close_modal_closes_configured_dialog() {
    let page = modal_page();
    QuickTransactionForm::default().close_modal(&page, &UiConfig::default());
    assert_eq!(*page.closed_dialogs.borrow(), ["quick-transaction-modal"]);

    let bare = RecordingPage::new();
    QuickTransactionForm::default().close_modal(&bare, &UiConfig::default());
    assert!(bare.closed_dialogs.borrow().is_empty());
}

#[test]
fn dispatch_account_changed_emits_event() {
    let events = RecordingEvents::default();
    QuickTransactionForm::default().dispatch_account_changed(&events);
    assert_eq!(*events.events.borrow(), [UiEvent::AccountChanged]);
}

// =============================================================
// Payload
// =============================================================

#[test]
fn payload_fixed_keys() {
    let payload = build_payload(&fields());
    assert_eq!(payload.template_id.as_deref(), Some("tpl-listrik"));
    assert_eq!(payload.amount, 150_000);
    assert_eq!(payload.description.as_deref(), Some("Bayar listrik Januari"));
    assert_eq!(payload.transaction_date.as_deref(), Some("2025-01-31"));
    assert_eq!(payload.reference_number, "");
    assert_eq!(payload.notes, "");
    assert!(payload.account_mappings.is_empty());
    assert_eq!(payload.variables, None);
}

#[test]
fn payload_amount_defaults_to_zero() {
    let payload = build_payload(&FormFields::from_pairs([("amount", "")]));
    assert_eq!(payload.amount, 0);
    assert_eq!(build_payload(&FormFields::new()).amount, 0);
    assert_eq!(build_payload(&FormFields::from_pairs([("amount", "-10")])).amount, 0);
}

#[test]
fn payload_optional_text_fields_pass_through() {
    let mut f = fields();
    f.push("referenceNumber", "INV-2025-001");
    f.push("notes", "lunas");
    let payload = build_payload(&f);
    assert_eq!(payload.reference_number, "INV-2025-001");
    assert_eq!(payload.notes, "lunas");
}

#[test]
fn account_mappings_skip_empty_values() {
    let f = FormFields::from_pairs([("accountMapping[101]", "5"), ("accountMapping[202]", "")]);
    let mappings = collect_account_mappings(&f);
    assert_eq!(mappings, BTreeMap::from([("101".to_owned(), "5".to_owned())]));
}

#[test]
fn account_mappings_match_anywhere_in_key() {
    let f = FormFields::from_pairs([
        ("lines.accountMapping[Kas]", "acc-1"),
        ("accountMapping[]", "acc-2"),
        ("accountMapping[unclosed", "acc-3"),
        ("accountMapping", "acc-4"),
        ("x[accountMapping[] accountMapping[Bank]", "acc-5"),
    ]);
    let mappings = collect_account_mappings(&f);
    assert_eq!(
        mappings,
        BTreeMap::from([("Kas".to_owned(), "acc-1".to_owned()), ("Bank".to_owned(), "acc-5".to_owned())])
    );
}

#[test]
fn variables_keep_digits_only() {
    let f = FormFields::from_pairs([("var_rate", "12.5%"), ("var_unused", "")]);
    assert_eq!(collect_variables(&f), BTreeMap::from([("rate".to_owned(), 125)]));
    assert_eq!(build_payload(&f).variables, Some(BTreeMap::from([("rate".to_owned(), 125)])));
}

#[test]
fn variables_absent_when_none_non_empty() {
    let f = FormFields::from_pairs([("var_a", ""), ("var_b", "n/a"), ("variable", "10")]);
    assert!(collect_variables(&f).is_empty());
    let json = serde_json::to_value(build_payload(&f)).unwrap();
    assert!(json.get("variables").is_none());
}

#[test]
fn variables_skip_overflow() {
    let f = FormFields::from_pairs([("var_big", "99999999999999999999999"), ("var_ok", "1.000")]);
    assert_eq!(collect_variables(&f), BTreeMap::from([("ok".to_owned(), 1000)]));
}

#[test]
fn build_request_targets_endpoint_with_csrf() {
    let page = RecordingPage::new()
        .with_meta("_csrf", "tok")
        .with_meta("_csrf_header", "X-CSRF-TOKEN");
    let req = build_request(&fields(), &page, &UiConfig::default()).unwrap();
    assert_eq!(req.path, "/transactions/api");
    assert_eq!(req.headers, [("X-CSRF-TOKEN".to_owned(), "tok".to_owned())]);
    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["templateId"], "tpl-listrik");
    assert_eq!(body["amount"], 150_000);
}

#[test]
fn build_request_without_csrf_has_no_headers() {
    let req = build_request(&fields(), &RecordingPage::new(), &UiConfig::default()).unwrap();
    assert!(req.headers.is_empty());
}

// =============================================================
// submit_form
// =============================================================

#[test]
fn submit_success_closes_modal_and_navigates() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = modal_page();
    let transport = ScriptedTransport::responding(201, r#"{"id":42}"#);

    let outcome = block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert!(matches!(outcome, SubmitOutcome::Created(ref id) if id.to_string() == "42"));
    assert_eq!(*page.navigations.borrow(), ["/transactions/42"]);
    assert_eq!(*page.closed_dialogs.borrow(), ["quick-transaction-modal"]);
    assert!(page.alerts.borrow().is_empty());
    assert!(!form.borrow().submitting);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn submit_success_without_modal_still_navigates() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(200, r#"{"id":"abc-123"}"#);

    block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert!(page.closed_dialogs.borrow().is_empty());
    assert_eq!(*page.navigations.borrow(), ["/transactions/abc-123"]);
}

#[test]
fn submit_rejected_alerts_body_and_stays() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = modal_page();
    let transport = ScriptedTransport::responding(400, "Template tidak ditemukan");

    let outcome = block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Rejected { status: 400, .. })));
    assert_eq!(*page.alerts.borrow(), ["Gagal menyimpan: Template tidak ditemukan"]);
    assert!(page.navigations.borrow().is_empty());
    assert!(page.closed_dialogs.borrow().is_empty());
    assert!(!form.borrow().submitting);
}

#[test]
fn submit_transport_error_alerts_message() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = RecordingPage::new();
    let transport = ScriptedTransport::failing("Failed to fetch");

    let outcome = block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Transport(_))));
    assert_eq!(*page.alerts.borrow(), ["Gagal menyimpan: Failed to fetch"]);
    assert!(!form.borrow().submitting);
}

#[test]
fn submit_bad_success_body_alerts() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(200, "<html>login</html>");

    let outcome = block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Decode(_))));
    assert_eq!(page.alerts.borrow().len(), 1);
    assert!(page.alerts.borrow()[0].starts_with("Gagal menyimpan: "));
    assert!(page.navigations.borrow().is_empty());
    assert!(!form.borrow().submitting);
}

#[test]
fn submit_while_submitting_is_noop() {
    let form = RefCell::new(QuickTransactionForm { amount: 10, submitting: true });
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(201, r#"{"id":1}"#);

    let outcome = block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert!(matches!(outcome, SubmitOutcome::Ignored));
    assert_eq!(transport.request_count(), 0);
    assert_eq!(*form.borrow(), QuickTransactionForm { amount: 10, submitting: true });
    assert!(page.alerts.borrow().is_empty());
}

#[test]
fn overlapping_submit_is_dropped_while_request_in_flight() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = modal_page();
    let (transport, release) = ScriptedTransport::responding(201, r#"{"id":7}"#).gated();
    let cfg = UiConfig::default();
    let f = fields();

    let first = submit_form(&form, &f, &page, &transport, &cfg);
    let second = async {
        let outcome = submit_form(&form, &f, &page, &transport, &cfg).await;
        assert!(form.borrow().submitting, "first request still in flight");
        release.send(()).unwrap();
        outcome
    };
    let (first, second) = block_on(async { futures::join!(first, second) });

    assert!(matches!(first, SubmitOutcome::Created(_)));
    assert!(matches!(second, SubmitOutcome::Ignored));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(*page.navigations.borrow(), ["/transactions/7"]);
    assert!(!form.borrow().submitting);
}

#[test]
fn submit_uses_configured_endpoint_and_prefix() {
    let cfg = UiConfig {
        transaction_endpoint: "/api/quick".into(),
        transaction_detail_prefix: "/jurnal/".into(),
        alert_prefix: "Error: ".into(),
        ..UiConfig::default()
    };
    let form = RefCell::new(QuickTransactionForm::default());
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(201, r#"{"id":9}"#);

    block_on(submit_form(&form, &fields(), &page, &transport, &cfg));

    assert_eq!(transport.requests.borrow()[0].path, "/api/quick");
    assert_eq!(*page.navigations.borrow(), ["/jurnal/9"]);
}

// =============================================================
// submit_with
// =============================================================

#[test]
fn unreadable_form_alerts_and_resets() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = modal_page();
    let transport = ScriptedTransport::responding(201, r#"{"id":1}"#);
    let cfg = UiConfig::default();

    let outcome = block_on(submit_with(
        &form,
        || Err(DomError("form #quick-transaction-form not found".into())),
        &page,
        &transport,
        &cfg,
        || {},
    ));

    assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Form(_))));
    assert_eq!(*page.alerts.borrow(), ["Gagal menyimpan: form #quick-transaction-form not found"]);
    assert_eq!(transport.request_count(), 0);
    assert!(page.navigations.borrow().is_empty());
    assert!(!form.borrow().submitting);
}

#[test]
fn form_is_not_read_while_submitting() {
    let form = RefCell::new(QuickTransactionForm { amount: 0, submitting: true });
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(201, r#"{"id":1}"#);
    let read = Cell::new(false);

    let outcome = block_on(submit_with(
        &form,
        || {
            read.set(true);
            Ok(fields())
        },
        &page,
        &transport,
        &UiConfig::default(),
        || {},
    ));

    assert!(matches!(outcome, SubmitOutcome::Ignored));
    assert!(!read.get());
    assert!(page.alerts.borrow().is_empty());
}

#[test]
fn on_change_sees_submitting_then_idle() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(201, r#"{"id":3}"#);
    let seen = RefCell::new(Vec::new());

    block_on(submit_with(
        &form,
        || Ok(fields()),
        &page,
        &transport,
        &UiConfig::default(),
        || seen.borrow_mut().push(form.borrow().submit_button_text()),
    ));

    assert_eq!(*seen.borrow(), ["Menyimpan...", "Simpan Draft"]);
}

#[test]
fn float_encoded_id_navigates_without_fraction() {
    let form = RefCell::new(QuickTransactionForm::default());
    let page = RecordingPage::new();
    let transport = ScriptedTransport::responding(201, r#"{"id":42.0}"#);

    block_on(submit_form(&form, &fields(), &page, &transport, &UiConfig::default()));

    assert_eq!(*page.navigations.borrow(), ["/transactions/42"]);
}

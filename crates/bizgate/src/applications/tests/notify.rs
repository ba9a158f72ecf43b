use crate::applications::{compose_sms, NotificationContext, SmsStyle};

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn context<'a>(fields: &'a [String], attachments: &'a [String]) -> NotificationContext<'a> {
    NotificationContext {
        title: "Subsidiya",
        missing_fields: fields,
        missing_attachments: attachments,
        requires_digital_signature: false,
        status_unclear: false,
        service_url: None,
    }
}

#[test]
fn plain_message_lists_fields_and_omits_empty_attachments() {
    let fields = names(&["tin"]);
    let sms = compose_sms(&context(&fields, &[]), "https://my.gov.uz", SmsStyle::Plain);

    assert!(sms.contains("maydonlar: tin"));
    assert!(!sms.contains("hujjatlar:"));
    assert_eq!(
        sms,
        "Subsidiya. Kerakli ma'lumotlar (maydonlar: tin). To'ldirish: https://my.gov.uz"
    );
}

#[test]
fn plain_message_joins_both_clauses() {
    let fields = names(&["tin", "phone"]);
    let attachments = names(&["charter"]);
    let sms = compose_sms(&context(&fields, &attachments), "https://x.uz", SmsStyle::Plain);

    assert!(sms.contains("(maydonlar: tin, phone; hujjatlar: charter)"));
}

#[test]
fn generic_phrase_when_nothing_is_listed() {
    let sms = compose_sms(&context(&[], &[]), "", SmsStyle::Plain);
    assert_eq!(sms, "Subsidiya. Qo'shimcha ma'lumot kerak");
}

#[test]
fn blank_title_falls_back() {
    let mut context = context(&[], &[]);
    context.title = "   ";
    let sms = compose_sms(&context, "https://my.gov.uz", SmsStyle::Plain);
    assert!(sms.starts_with("Ariza. "));
}

#[test]
fn compact_message_truncates_and_adds_notes() {
    let fields = names(&["a", "b", "c", "d", "e", "f"]);
    let mut context = context(&fields, &[]);
    context.requires_digital_signature = true;
    context.status_unclear = true;
    context.service_url = Some("https://soliq.uz/imtiyoz");

    let sms = compose_sms(&context, "https://my.gov.uz", SmsStyle::Compact);

    assert!(sms.contains("maydonlar: a, b, c, d +2"));
    assert!(sms.contains("ERI talab qilinadi"));
    assert!(sms.contains("Xizmat holati aniq emas"));
    assert!(sms.contains("Xizmat: https://soliq.uz/imtiyoz"));
}

#[test]
fn plain_style_ignores_notes() {
    let fields = names(&["a", "b", "c", "d", "e"]);
    let mut context = context(&fields, &[]);
    context.requires_digital_signature = true;

    let sms = compose_sms(&context, "https://my.gov.uz", SmsStyle::Plain);

    assert!(sms.contains("maydonlar: a, b, c, d, e"));
    assert!(!sms.contains("ERI"));
}

use bonjour::extract;
use bonjour::{BonjourClassification, ClassifiedStream};

/// Logs every classified frame until the stream ends.
pub fn run(stream: ClassifiedStream) {
    let stats = stream.stats();

    for item in stream {
        match item {
            Ok(classification) => log::info!("{}", describe(&classification)),
            Err(err) => log::error!("Capture stopped. {err}"),
        }
    }

    log::info!(
        "Capture finished. Frames read: {}, mDNS: {}, skipped: {}.",
        stats.frames_read(),
        stats.matched(),
        stats.skipped()
    );
}

pub fn describe(classification: &BonjourClassification) -> String {
    let frame = &classification.frame;

    let kind = match classification.is_query {
        true => "Query",
        false => "Answer",
    };

    // mDNS replies may go straight to the asking host
    let delivery = match extract::ethernet(frame) {
        Ok((_, destination)) if !destination.is_mdns_multicast() => " (unicast)",
        _ => "",
    };

    let vlan = match extract::vlan_tag(frame) {
        Some(tag) if tag.is_priority_tag() => "priority-tagged".to_string(),
        Some(tag) => format!("VLAN {}", tag.identifier),
        None => "untagged".to_string(),
    };

    let ip_version = extract::ip_version(frame)
        .map(|version| version.to_string())
        .unwrap_or_default();

    let entries: Vec<String> = match extract::dns_message(frame) {
        Ok(dns) if classification.is_query => dns
            .question_section
            .iter()
            .map(|question| question.name.clone())
            .collect(),
        Ok(dns) => dns
            .records()
            .map(|record| format!("{} {} {}", record.name, record.record_type, record.data))
            .collect(),
        Err(_) => Vec::new(),
    };

    format!(
        "{kind} from {}{delivery} ({vlan}, {ip_version}): {}",
        classification.source_mac,
        entries.join(", ")
    )
}

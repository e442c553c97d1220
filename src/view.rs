use std::fmt::Write;
use url::Url;

use crate::identifier::IdentifierMode;
use crate::session::Session;

pub const PLACEHOLDER: &str = "Capture photo to see results";

/// Render the session as plain text for the terminal.
pub fn render(session: &Session, store: &Url) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, session, store);
    out
}

fn write_screen(out: &mut String, session: &Session, store: &Url) -> std::fmt::Result {
    writeln!(out, "==== EMOTION SENSE :: game recommender ====")?;
    let id = session.identifier();
    let kind = match id.mode() {
        IdentifierMode::User => "user ID",
        IdentifierMode::Product => "steam ID",
    };
    writeln!(out, "{kind:>9}: {}", id.text())?;
    match session.capture_state().image() {
        Some(img) => writeln!(out, "    photo: captured ({} bytes), `retake` to clear", img.len())?,
        None => writeln!(out, "    photo: awaiting capture")?,
    }
    let button = if session.is_loading() {
        "[ Analyzing... ]"
    } else if session.can_submit() {
        "[ Get Recommendations ]  (submit)"
    } else {
        "[ Get Recommendations ]  (disabled)"
    };
    writeln!(out, "{button}")?;
    writeln!(out)?;

    match session.result() {
        Some(result) => {
            let emotion = if result.emotion.is_empty() {
                "..."
            } else {
                result.emotion.as_str()
            };
            writeln!(out, "DETECTED EMOTION: {}", emotion.to_uppercase())?;
            for (rank, item) in result.items.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {:<12} {}  <{}>",
                    rank + 1,
                    item.product_id,
                    item.title,
                    item.store_link(store)
                )?;
            }
        }
        None => writeln!(out, "{PLACEHOLDER}")?,
    }

    if let Some(n) = session.notification() {
        writeln!(out)?;
        writeln!(out, "[{}] {}", n.severity, n.message)?;
    }
    Ok(())
}

//! Store, inspect or clear the feedback bot token in the OS keyring.

use inapp_feedback::issue_gateway::{AuthToken, KeyringTokenStore, TokenError};

const USAGE: &str = "usage: inapp-feedback-token <set TOKEN | clear | status>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = KeyringTokenStore::new();
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("set") => {
            let Some(token) = args.next() else {
                return Err(USAGE.into());
            };
            store.set(&token)?;
            println!("Feedback token stored in the OS keyring.");
        }
        Some("clear") => {
            store.delete()?;
            println!("Feedback token removed from the OS keyring.");
        }
        Some("status") => match AuthToken::resolve() {
            Ok(_) => println!("Feedback token available."),
            Err(TokenError::Missing) => println!("No feedback token configured."),
            Err(err) => return Err(err.into()),
        },
        _ => return Err(USAGE.into()),
    }
    Ok(())
}

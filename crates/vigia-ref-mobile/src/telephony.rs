//! Dialling the emergency numbers listed on the high-risk advice view.

use tracing::{info, warn};

use vigia_config::EmergencyContact;
use vigia_contracts::error::{VigiaError, VigiaResult};
use vigia_core::traits::Dialer;

/// Alert text shown when a call cannot be placed.
pub const DIAL_FAILED_ALERT: &str = "Error trying to place the call";

/// The `tel:` URL for `number`, with surrounding whitespace removed.
pub fn tel_url(number: &str) -> String {
    format!("tel:{}", number.trim())
}

/// Ask `dialer` to call `contact`.
///
/// Whatever the dialer reports is normalised to `DialFailed` carrying the
/// contact's number.
pub fn dial(dialer: &dyn Dialer, contact: &EmergencyContact) -> VigiaResult<()> {
    let url = tel_url(&contact.number);
    match dialer.open_url(&url) {
        Ok(()) => {
            info!(number = %contact.number, label = %contact.label, "call placed");
            Ok(())
        }
        Err(e) => {
            warn!(number = %contact.number, error = %e, "call failed");
            Err(match e {
                VigiaError::DialFailed { .. } => e,
                other => VigiaError::DialFailed {
                    number: contact.number.clone(),
                    reason: other.to_string(),
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use vigia_config::EmergencyContact;
    use vigia_contracts::error::{VigiaError, VigiaResult};
    use vigia_core::traits::Dialer;

    use crate::mock_platform::MockDialer;

    use super::{dial, tel_url};

    fn contact(number: &str) -> EmergencyContact {
        EmergencyContact {
            label: "Health Ministry".to_string(),
            number: number.to_string(),
            note: None,
        }
    }

    struct BrokenDialer;

    impl Dialer for BrokenDialer {
        fn open_url(&self, _url: &str) -> VigiaResult<()> {
            Err(VigiaError::LocationUnavailable {
                reason: "wrong subsystem".to_string(),
            })
        }
    }

    #[test]
    fn tel_url_keeps_dashes_and_trims() {
        assert_eq!(tel_url(" 0800-222-1002 "), "tel:0800-222-1002");
        assert_eq!(tel_url("148"), "tel:148");
    }

    #[test]
    fn dial_opens_the_tel_url() {
        let dialer = MockDialer::new();
        dial(&dialer, &contact("148")).unwrap();
        assert_eq!(dialer.dialled(), vec!["tel:148".to_string()]);
    }

    #[test]
    fn dial_failure_is_dial_failed() {
        match dial(&MockDialer::failing(), &contact("107")) {
            Err(VigiaError::DialFailed { number, .. }) => assert_eq!(number, "107"),
            other => panic!("expected DialFailed, got {:?}", other),
        }
    }

    #[test]
    fn foreign_errors_are_normalised_to_dial_failed() {
        match dial(&BrokenDialer, &contact("148")) {
            Err(VigiaError::DialFailed { number, reason }) => {
                assert_eq!(number, "148");
                assert!(reason.contains("wrong subsystem"));
            }
            other => panic!("expected DialFailed, got {:?}", other),
        }
    }
}

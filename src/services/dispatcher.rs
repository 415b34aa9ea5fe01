use crate::error::Result;
use crate::services::page::{selectors, Dispatch, PhotoPage};
use std::time::Duration;
use tracing::{debug, warn};

/// Fires the move-to-trash sequence: delete click, a settle delay for the
/// confirmation dialog to appear, then the confirm click.
///
/// Best effort. The returned statuses say what was dispatched, not whether
/// the photo is gone; the caller infers that from the next locate.
pub async fn trigger_delete<P: PhotoPage + ?Sized>(
    page: &P,
    settle_delay: Duration,
) -> Result<(Dispatch, Dispatch)> {
    let delete = page.click(selectors::DELETE_BUTTON).await?;
    if delete == Dispatch::NoTarget {
        warn!("delete control absent; nothing dispatched");
        return Ok((Dispatch::NoTarget, Dispatch::NoTarget));
    }

    tokio::time::sleep(settle_delay).await;

    let confirm = page.click_first(selectors::CONFIRM_DELETE).await?;
    if confirm == Dispatch::NoTarget {
        warn!("confirmation control absent after delete click");
    } else {
        debug!("delete dispatched");
    }
    Ok((delete, confirm))
}

/// Fires the keep-and-advance action: clicks the first "next photo"
/// control present among the locale variants.
pub async fn trigger_advance<P: PhotoPage + ?Sized>(page: &P) -> Result<Dispatch> {
    let dispatch = page.click_first(selectors::NEXT_BUTTONS).await?;
    match dispatch {
        Dispatch::Clicked => debug!("advance dispatched"),
        Dispatch::NoTarget => warn!("no next-photo control found"),
    }
    Ok(dispatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::page::PhotoPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every click and answers from a fixed set of present
    /// selectors.
    struct RecordingPage {
        present: Vec<&'static str>,
        clicks: Mutex<Vec<String>>,
    }

    impl RecordingPage {
        fn with_present(present: Vec<&'static str>) -> Self {
            Self {
                present,
                clicks: Mutex::new(Vec::new()),
            }
        }

        fn clicks(&self) -> Vec<String> {
            self.clicks.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PhotoPage for RecordingPage {
        async fn current_url(&self) -> crate::error::Result<String> {
            Ok(String::new())
        }

        async fn visible_photo_url(&self) -> crate::error::Result<Option<String>> {
            Ok(None)
        }

        async fn click(&self, selector: &str) -> crate::error::Result<Dispatch> {
            if self.present.contains(&selector) {
                self.clicks.lock().unwrap().push(selector.to_string());
                Ok(Dispatch::Clicked)
            } else {
                Ok(Dispatch::NoTarget)
            }
        }
    }

    #[tokio::test]
    async fn delete_clicks_delete_then_confirm() {
        let page = RecordingPage::with_present(vec![
            selectors::DELETE_BUTTON,
            selectors::CONFIRM_DELETE[0],
        ]);
        let (delete, confirm) = trigger_delete(&page, Duration::ZERO).await.unwrap();
        assert_eq!((delete, confirm), (Dispatch::Clicked, Dispatch::Clicked));
        assert_eq!(
            page.clicks(),
            vec![selectors::DELETE_BUTTON, selectors::CONFIRM_DELETE[0]]
        );
    }

    #[tokio::test]
    async fn absent_delete_control_is_a_silent_no_op() {
        let page = RecordingPage::with_present(vec![]);
        let (delete, confirm) = trigger_delete(&page, Duration::ZERO).await.unwrap();
        assert_eq!((delete, confirm), (Dispatch::NoTarget, Dispatch::NoTarget));
        assert!(page.clicks().is_empty());
    }

    #[tokio::test]
    async fn advance_stops_at_the_first_matching_locale_variant() {
        // Only the English variant exists; the Spanish ones before it in
        // the list must be passed over without stopping the sequence.
        let page = RecordingPage::with_present(vec![selectors::NEXT_BUTTONS[2]]);
        let dispatch = trigger_advance(&page).await.unwrap();
        assert_eq!(dispatch, Dispatch::Clicked);
        assert_eq!(page.clicks(), vec![selectors::NEXT_BUTTONS[2]]);
    }

    #[tokio::test]
    async fn advance_with_no_control_reports_no_target() {
        let page = RecordingPage::with_present(vec![]);
        assert_eq!(trigger_advance(&page).await.unwrap(), Dispatch::NoTarget);
    }
}

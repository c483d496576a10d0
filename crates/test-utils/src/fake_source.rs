use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use docwatch::watch::{Change, ChangeSource};

/// A change source that yields a scripted sequence of changes, then pends
/// forever — a loop driven by it can only exit via shutdown.
///
/// Each change is delivered after a small delay so the consuming loop gets
/// a chance to finish handling the previous one first.
pub struct ScriptedChangeSource {
    changes: VecDeque<Change>,
    delay: Duration,
}

impl ScriptedChangeSource {
    pub fn new(changes: Vec<Change>) -> Self {
        Self {
            changes: changes.into(),
            delay: Duration::from_millis(5),
        }
    }
}

impl ChangeSource for ScriptedChangeSource {
    fn wait_for_change(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Change>> + Send + '_>> {
        let next = self.changes.pop_front();
        let delay = self.delay;

        Box::pin(async move {
            match next {
                Some(change) => {
                    tokio::time::sleep(delay).await;
                    Ok(change)
                }
                None => std::future::pending().await,
            }
        })
    }
}

// Latest raw text from the satellite, location and local-oscillator
// channels.

use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedTexts {
    pub satellite: Option<String>,
    pub location: Option<String>,
    /// `BEACON:\n<beacon>\n\nDVB:\n<dvb>`
    pub local_oscillator: Option<String>,
}

pub struct FeedStore {
    texts: watch::Sender<FeedTexts>,
}

impl FeedStore {
    pub fn new() -> Self {
        let (texts, _) = watch::channel(FeedTexts::default());
        Self { texts }
    }

    pub fn set_satellite(&self, text: impl Into<String>) {
        let text = text.into();
        self.texts.send_modify(|t| t.satellite = Some(text));
    }

    pub fn set_location(&self, text: impl Into<String>) {
        let text = text.into();
        self.texts.send_modify(|t| t.location = Some(text));
    }

    pub fn set_local_oscillator(&self, beacon: Option<&str>, dvb: Option<&str>) {
        let text = format!(
            "BEACON:\n{}\n\nDVB:\n{}",
            beacon.unwrap_or("-"),
            dvb.unwrap_or("-")
        );
        self.texts.send_modify(|t| t.local_oscillator = Some(text));
    }

    pub fn current(&self) -> FeedTexts {
        self.texts.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedTexts> {
        self.texts.subscribe()
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

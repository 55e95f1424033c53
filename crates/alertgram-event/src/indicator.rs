//! Status indicator glyphs prefixed to rendered messages.

use std::fmt;

use crate::types::{NotificationType, ServiceState};

/// A visual glyph summarizing the type and severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Heavy check mark.
    CheckMark,
    /// Information source.
    Info,
    /// Play button.
    Play,
    /// Eject button.
    Eject,
    /// Stop button.
    Stop,
    /// Shuffle tracks button.
    Shuffle,
    /// Green heart.
    GreenHeart,
    /// Broken heart.
    BrokenHeart,
    /// Yellow heart.
    YellowHeart,
    /// Purple heart.
    PurpleHeart,
}

impl Indicator {
    /// Selects the indicator for a notification type.
    ///
    /// Problems are graded by service state; a problem without a service
    /// state (host problems) is shown as a broken heart.
    #[must_use]
    pub const fn select(
        notification_type: NotificationType,
        service_state: Option<ServiceState>,
    ) -> Self {
        match notification_type {
            NotificationType::Acknowledgement => Self::CheckMark,
            NotificationType::Custom => Self::Info,
            NotificationType::DowntimeEnd => Self::Play,
            NotificationType::DowntimeRemoved => Self::Eject,
            NotificationType::DowntimeStart => Self::Stop,
            NotificationType::FlappingEnd | NotificationType::FlappingStart => Self::Shuffle,
            NotificationType::Recovery => Self::GreenHeart,
            NotificationType::Problem => match service_state {
                None | Some(ServiceState::Critical) => Self::BrokenHeart,
                Some(ServiceState::Warning) => Self::YellowHeart,
                Some(ServiceState::Ok | ServiceState::Unknown) => Self::PurpleHeart,
            },
        }
    }

    /// Returns the emoji for this indicator.
    #[must_use]
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::CheckMark => "\u{2714}\u{fe0f}",
            Self::Info => "\u{2139}\u{fe0f}",
            Self::Play => "\u{25b6}\u{fe0f}",
            Self::Eject => "\u{23cf}\u{fe0f}",
            Self::Stop => "\u{23f9}\u{fe0f}",
            Self::Shuffle => "\u{1f500}",
            Self::GreenHeart => "\u{1f49a}",
            Self::BrokenHeart => "\u{1f494}",
            Self::YellowHeart => "\u{1f49b}",
            Self::PurpleHeart => "\u{1f49c}",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

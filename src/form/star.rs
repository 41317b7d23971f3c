//! Star rating picker. The committed rating lives with the form; the hover
//! preview is transient and handled by the rendered control in the browser.

use crate::models::{MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarPicker {
    rating: u8,
    disabled: bool,
}

impl StarPicker {
    pub fn new(rating: u8, disabled: bool) -> Self {
        Self {
            rating: rating.min(MAX_RATING),
            disabled,
        }
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Commit `star`. Returns the new rating, or `None` if the picker is
    /// disabled or `star` is out of range.
    pub fn click(&mut self, star: u8) -> Option<u8> {
        if self.disabled || !(MIN_RATING..=MAX_RATING).contains(&star) {
            return None;
        }
        self.rating = star;
        Some(star)
    }

    pub fn is_filled(&self, star: u8) -> bool {
        star <= self.rating
    }

    pub fn label(&self) -> String {
        label_for(self.rating)
    }
}

/// Label shown under the stars once `rating` is committed.
pub fn label_for(rating: u8) -> String {
    match rating {
        0 => "Select Rating".to_string(),
        1 => "1 Star".to_string(),
        n => format!("{} Stars", n),
    }
}

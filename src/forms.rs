use crate::models::{AddRequest, EditRequest};

pub const MAX_REVIEW_LEN: usize = 250;

/// A validated rating/review submission.
#[derive(Debug, PartialEq)]
pub struct RatingReview {
    pub rating: f64,
    pub review: String,
}

/// Field errors, rendered next to the matching input.
#[derive(Debug, Default, PartialEq)]
pub struct FieldErrors {
    pub rating: Option<String>,
    pub review: Option<String>,
    pub title: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.review.is_none() && self.title.is_none()
    }
}

pub fn validate_edit(req: &EditRequest) -> Result<RatingReview, FieldErrors> {
    let mut errors = FieldErrors::default();

    let rating = match req.rating.trim() {
        "" => {
            errors.rating = Some("Rating is required.".to_string());
            None
        },
        raw => match raw.parse::<f64>() {
            Ok(r) if r.is_finite() && (0.0..=10.0).contains(&r) => Some(r),
            Ok(_) => {
                errors.rating = Some("Rating must be between 0 and 10.".to_string());
                None
            },
            Err(_) => {
                errors.rating = Some("Rating must be a number, e.g. 7.5.".to_string());
                None
            },
        },
    };

    let review = req.review.trim();
    if review.is_empty() {
        errors.review = Some("Review is required.".to_string());
    } else if review.chars().count() > MAX_REVIEW_LEN {
        errors.review = Some(format!("Review must be at most {MAX_REVIEW_LEN} characters."));
    }

    match rating {
        Some(rating) if errors.is_empty() => {
            Ok(RatingReview { rating, review: review.to_string() })
        },
        _ => Err(errors),
    }
}

pub fn validate_add(req: &AddRequest) -> Result<String, FieldErrors> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(FieldErrors {
            title: Some("Movie title is required.".to_string()),
            ..Default::default()
        });
    }
    Ok(title.to_string())
}

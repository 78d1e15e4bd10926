//! Review submission

use std::sync::Arc;

use super::validation::ValidationService;
use crate::api::OfferApi;
use crate::error::Result;
use crate::store::{Action, Lifecycle, Store};
use crate::types::{CommentInfo, Review};

#[derive(Clone)]
pub struct ReviewsService {
    store: Store,
    api: Arc<dyn OfferApi>,
    validation: ValidationService,
}

impl ReviewsService {
    pub fn new(store: Store, api: Arc<dyn OfferApi>, validation: ValidationService) -> Self {
        Self {
            store,
            api,
            validation,
        }
    }

    /// Post a review for offer `id`
    ///
    /// The returned review is appended to the current list; the list is
    /// never refetched.
    pub async fn send_review(&self, id: &str, comment: CommentInfo) -> Result<Review> {
        self.validation.validate_review(&comment)?;

        self.store.dispatch(Action::SendReviewOp(Lifecycle::Pending));
        match self.api.post_review(id, &comment).await {
            Ok(review) => {
                self.store.dispatch(Action::AppendReview(review.clone()));
                self.store.dispatch(Action::SendReviewOp(Lifecycle::Fulfilled(())));
                Ok(review)
            }
            Err(e) => {
                tracing::warn!("Failed to post review for {}: {}", id, e);
                self.store
                    .dispatch(Action::SendReviewOp(Lifecycle::Rejected(e.to_string())));
                Err(e.into())
            }
        }
    }
}

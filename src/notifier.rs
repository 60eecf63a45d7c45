use std::future::Future;

use crate::client::ClientError;

/// Delivers text messages to the operator's chat
pub trait Notifier {
    fn deliver(&self, text: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}

//! Client directory port.

use async_trait::async_trait;

use crate::domain::client::Client;
use crate::domain::foundation::{DomainError, PhoneNumber};

/// Lookup and lazy registration of clients by phone number.
///
/// Registration is always an explicit call; nothing in the booking path
/// creates clients implicitly.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Returns `None` if no client owns this phone.
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Client>, DomainError>;

    /// Registers a client.
    ///
    /// Phone numbers are unique: if another request registered the same
    /// phone first, the stored client is returned instead.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, client: Client) -> Result<Client, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_directory_is_object_safe() {
        fn _accepts_dyn(_dir: &dyn ClientDirectory) {}
    }
}

//! Generate-and-cache facade.
//!
//! Transports talk to [`CardService`] only: it runs the generator, keeps the
//! result under the conversation id, and serves exports from that cache.

use crate::brand::{classify, Brand};
use crate::card::Batch;
use crate::error::CardGenError;
use crate::export::{export, ExportFile, ExportFormat};
use crate::generator::{generate_request, GenerationRequest};
use crate::session::{ConversationId, SessionStore};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// The generated records, as cached
    pub batch: Arc<Batch>,
    /// Brand of the requested BIN
    pub brand: Brand,
}

/// Entry point for transports.
#[derive(Clone)]
pub struct CardService {
    store: Arc<dyn SessionStore>,
}

impl CardService {
    /// Creates a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Generates a batch with the thread-local RNG and caches it for `conversation`.
    pub async fn generate(
        &self,
        conversation: ConversationId,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        // ThreadRng is !Send, keep it out of the await below
        let batch = {
            let mut rng = rand::rng();
            generate_request(&mut rng, request)
        };
        self.store_batch(conversation, request, batch).await
    }

    /// Same as [`CardService::generate`] with an explicit random source.
    pub async fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        conversation: ConversationId,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        let batch = generate_request(rng, request);
        self.store_batch(conversation, request, batch).await
    }

    async fn store_batch(
        &self,
        conversation: ConversationId,
        request: &GenerationRequest,
        batch: Batch,
    ) -> GenerationOutcome {
        let brand = classify(request.bin.as_str());
        let batch = Arc::new(batch);

        self.store.put(conversation, batch.clone()).await;
        info!(
            "Generated {} {} records for conversation {}",
            batch.len(),
            brand,
            conversation
        );

        GenerationOutcome { batch, brand }
    }

    /// Serializes the latest batch of `conversation`.
    ///
    /// # Errors
    ///
    /// Returns `CardGenError::NoData` if nothing was generated in this
    /// conversation since the process started.
    pub async fn export(
        &self,
        conversation: ConversationId,
        format: ExportFormat,
    ) -> Result<ExportFile, CardGenError> {
        let batch = self.store.get(conversation).await;
        let file = export(batch.as_deref(), format)?;
        debug!(
            "Exported {} ({} bytes) for conversation {}",
            file.filename,
            file.payload.len(),
            conversation
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{BatchSize, Bin};
    use crate::generator::ExpiryOverride;
    use crate::luhn::is_valid;
    use crate::session::InMemorySessionStore;
    use crate::testing::{mock_store_empty, mock_store_with};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(bin: &str, count: usize) -> Result<GenerationRequest, CardGenError> {
        Ok(GenerationRequest::new(Bin::parse(bin)?).with_count(BatchSize::new(count)?))
    }

    #[tokio::test]
    async fn test_generate_then_export_text() -> Result<(), CardGenError> {
        let service = CardService::new(Arc::new(InMemorySessionStore::default()));
        let conversation = ConversationId(42);

        let outcome = service.generate(conversation, &request("457821", 5)?).await;
        assert_eq!(outcome.brand, Brand::Visa);
        assert_eq!(outcome.batch.len(), 5);
        assert!(outcome.batch.records().iter().all(|r| is_valid(r.number())));

        let file = service.export(conversation, ExportFormat::Text).await?;
        let text = String::from_utf8_lossy(&file.payload).to_string();
        let expected = outcome.batch.canonical_lines().collect::<Vec<_>>().join("\n");
        assert_eq!(text, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_export_without_generation_is_no_data() {
        let service = CardService::new(Arc::new(InMemorySessionStore::default()));
        let result = service.export(ConversationId(1), ExportFormat::Delimited).await;
        assert_eq!(result, Err(CardGenError::NoData));
    }

    #[tokio::test]
    async fn test_new_generation_replaces_previous() -> Result<(), CardGenError> {
        let service = CardService::new(Arc::new(InMemorySessionStore::default()));
        let conversation = ConversationId(3);
        let mut rng = StdRng::seed_from_u64(9);

        service
            .generate_with(&mut rng, conversation, &request("4111", 10)?)
            .await;
        let latest = service
            .generate_with(&mut rng, conversation, &request("510510", 2)?)
            .await;

        let file = service.export(conversation, ExportFormat::Text).await?;
        let text = String::from_utf8_lossy(&file.payload).to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.starts_with("510510")));
        assert_eq!(latest.brand, Brand::MasterCard);
        Ok(())
    }

    #[tokio::test]
    async fn test_generation_stores_under_conversation() -> Result<(), CardGenError> {
        let mut store = crate::session::MockSessionStore::new();
        store
            .expect_put()
            .withf(|conversation, batch| *conversation == ConversationId(77) && batch.len() == 3)
            .times(1)
            .returning(|_, _| ());

        let service = CardService::new(Arc::new(store));
        let req = request("601100", 3)?.with_expiry(ExpiryOverride::default());
        let outcome = service
            .generate_with(&mut StdRng::seed_from_u64(1), ConversationId(77), &req)
            .await;
        assert_eq!(outcome.brand, Brand::Discover);
        Ok(())
    }

    #[tokio::test]
    async fn test_export_reads_from_store() -> Result<(), CardGenError> {
        let service = CardService::new(Arc::new(mock_store_with(&[
            "4000000000000002|01|2026|123",
        ])?));
        let file = service
            .export(ConversationId(5), ExportFormat::Delimited)
            .await?;
        assert_eq!(
            String::from_utf8_lossy(&file.payload),
            "CC Number,Expiry Month,Expiry Year,CVV\n4000000000000002,01,2026,123"
        );

        let empty = CardService::new(Arc::new(mock_store_empty()));
        assert_eq!(
            empty.export(ConversationId(5), ExportFormat::Text).await,
            Err(CardGenError::NoData)
        );
        Ok(())
    }
}

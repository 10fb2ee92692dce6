//! Upload-and-extract flow.
//!
//! Alternate entry path into the wizard: one file in, one canonical document
//! out, rejoining the manual path at the review/template step. The two
//! collaborator calls run strictly in sequence and progress is reported as
//! three discrete phases on the session. Failure at either stage resets the
//! session to idle with no partial data installed.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::clients::Extractor;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::wizard::registry::SessionRegistry;
use crate::wizard::state::UploadStage;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted upload formats, detected by magic bytes rather than the
/// client-reported content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    pub fn detect(content: &[u8]) -> Option<FileKind> {
        if content.starts_with(b"%PDF") {
            Some(FileKind::Pdf)
        } else if content.starts_with(b"PK\x03\x04") {
            Some(FileKind::Docx)
        } else {
            None
        }
    }
}

/// Validates the upload before any collaborator call is made.
pub fn check_upload(content: &[u8]) -> Result<FileKind, AppError> {
    if content.is_empty() {
        return Err(AppError::UnsupportedFile("The uploaded file is empty".to_string()));
    }
    if content.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::UnsupportedFile(
            "File too large. Maximum size: 5 MB".to_string(),
        ));
    }
    FileKind::detect(content).ok_or_else(|| {
        AppError::UnsupportedFile("Unsupported format. Upload a PDF or DOCX file".to_string())
    })
}

/// Runs the two-stage extraction against the collaborators and installs the
/// resulting canonical document on the session.
pub async fn run_upload(
    registry: &SessionRegistry,
    session_id: Uuid,
    filename: &str,
    content: Bytes,
    extractor: &Arc<dyn Extractor>,
) -> Result<ResumeDocument, AppError> {
    check_upload(&content)?;

    registry
        .with(session_id, |state| state.begin_upload())
        .await?;

    let parsed = match extractor.parse_file(filename, content).await {
        Ok(parsed) => parsed,
        Err(err) => {
            reset_stage(registry, session_id).await?;
            return Err(AppError::Collaborator(err));
        }
    };

    registry
        .with(session_id, |state| {
            state.set_upload_stage(UploadStage::Analyzing);
            Ok(())
        })
        .await?;

    let document = match extractor.extract_data(&parsed.text).await {
        Ok(document) => document.normalized(),
        Err(err) => {
            reset_stage(registry, session_id).await?;
            return Err(AppError::Collaborator(err));
        }
    };

    registry
        .with(session_id, |state| {
            state.set_upload_stage(UploadStage::Done);
            state.install_extracted(document.clone());
            Ok(())
        })
        .await?;

    info!(
        "session {session_id}: extracted resume from {} ({} chars of text)",
        parsed.filename,
        parsed.text.len()
    );
    Ok(document)
}

async fn reset_stage(registry: &SessionRegistry, session_id: Uuid) -> Result<(), AppError> {
    registry
        .with(session_id, |state| {
            state.set_upload_stage(UploadStage::Idle);
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::assembly::tests_support::sample_document;
    use crate::clients::{CollaboratorError, ParsedFile};
    use crate::wizard::state::Step;

    struct StubExtractor {
        fail_parse: bool,
        fail_extract: bool,
        gate: Option<Arc<Notify>>,
    }

    impl StubExtractor {
        fn ok() -> Self {
            Self {
                fail_parse: false,
                fail_extract: false,
                gate: None,
            }
        }
    }

    #[async_trait]
    impl Extractor for StubExtractor {
        async fn parse_file(
            &self,
            filename: &str,
            _content: Bytes,
        ) -> Result<ParsedFile, CollaboratorError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_parse {
                return Err(CollaboratorError::Service {
                    status: 400,
                    message: "Unsupported format. Use PDF or DOCX.".to_string(),
                });
            }
            Ok(ParsedFile {
                text: "ANA SILVA\nBackend Developer at Acme since 2022".to_string(),
                filename: filename.to_string(),
            })
        }

        async fn extract_data(&self, _text: &str) -> Result<ResumeDocument, CollaboratorError> {
            if self.fail_extract {
                return Err(CollaboratorError::Unexpected { status: 503 });
            }
            Ok(sample_document())
        }
    }

    fn pdf_bytes() -> Bytes {
        Bytes::from_static(b"%PDF-1.7 fake body")
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        assert_eq!(FileKind::detect(b"%PDF-1.7"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect(b"PK\x03\x04rest"), Some(FileKind::Docx));
        assert_eq!(FileKind::detect(b"GIF89a"), None);
    }

    #[test]
    fn test_check_upload_rejections() {
        assert!(matches!(check_upload(b""), Err(AppError::UnsupportedFile(_))));
        assert!(matches!(
            check_upload(b"plain text resume"),
            Err(AppError::UnsupportedFile(_))
        ));
        let oversized = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        assert!(matches!(
            check_upload(&oversized),
            Err(AppError::UnsupportedFile(_))
        ));
        assert_eq!(check_upload(b"%PDF-1.7").unwrap(), FileKind::Pdf);
    }

    #[tokio::test]
    async fn test_successful_upload_installs_document_at_template_step() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;
        let extractor: Arc<dyn Extractor> = Arc::new(StubExtractor::ok());

        let document = run_upload(&registry, id, "resume.pdf", pdf_bytes(), &extractor)
            .await
            .unwrap();
        assert_eq!(document, sample_document());

        let state = registry.get(id).await.unwrap();
        assert_eq!(state.current_step(), Step::Template);
        assert_eq!(state.upload_stage(), UploadStage::Done);
        assert_eq!(state.extracted(), Some(&sample_document()));
    }

    #[tokio::test]
    async fn test_parse_failure_resets_stage_and_surfaces_detail() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;
        let extractor: Arc<dyn Extractor> = Arc::new(StubExtractor {
            fail_parse: true,
            fail_extract: false,
            gate: None,
        });

        let err = run_upload(&registry, id, "resume.pdf", pdf_bytes(), &extractor)
            .await
            .unwrap_err();
        match err {
            AppError::Collaborator(inner) => {
                assert_eq!(inner.user_message(), Some("Unsupported format. Use PDF or DOCX."));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let state = registry.get(id).await.unwrap();
        assert_eq!(state.upload_stage(), UploadStage::Idle);
        assert_eq!(state.current_step(), Step::Personal);
        assert!(state.extracted().is_none());
    }

    #[tokio::test]
    async fn test_extract_failure_accepts_no_partial_data() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;
        let extractor: Arc<dyn Extractor> = Arc::new(StubExtractor {
            fail_parse: false,
            fail_extract: true,
            gate: None,
        });

        let err = run_upload(&registry, id, "resume.pdf", pdf_bytes(), &extractor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Collaborator(_)));

        let state = registry.get(id).await.unwrap();
        assert_eq!(state.upload_stage(), UploadStage::Idle);
        assert!(state.extracted().is_none());
    }

    #[tokio::test]
    async fn test_second_upload_rejected_while_first_in_flight() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;
        let gate = Arc::new(Notify::new());
        let extractor: Arc<dyn Extractor> = Arc::new(StubExtractor {
            fail_parse: false,
            fail_extract: false,
            gate: Some(gate.clone()),
        });

        let first = {
            let registry = registry.clone();
            let extractor = extractor.clone();
            tokio::spawn(async move {
                run_upload(&registry, id, "resume.pdf", pdf_bytes(), &extractor).await
            })
        };

        // let the first upload reach the gated parse call
        tokio::task::yield_now().await;
        while registry.get(id).await.unwrap().upload_stage() != UploadStage::ExtractingText {
            tokio::task::yield_now().await;
        }

        let err = run_upload(&registry, id, "resume.pdf", pdf_bytes(), &extractor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UploadInFlight));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(
            registry.get(id).await.unwrap().upload_stage(),
            UploadStage::Done
        );
    }
}

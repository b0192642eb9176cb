//! Read-only queries collecting every column that may point at an uploaded file.

use sqlx::PgPool;

/// Raw references gathered from the database.
#[derive(Debug, Clone, Default)]
pub struct UploadReferences {
    /// Photo, icon, avatar and featured-image values.
    pub paths: Vec<String>,
    /// Article bodies that embed `<img>` tags.
    pub html_documents: Vec<String>,
}

pub struct UploadReferenceRepo;

impl UploadReferenceRepo {
    pub async fn collect(pool: &PgPool) -> Result<UploadReferences, sqlx::Error> {
        let paths = sqlx::query_scalar::<_, String>(
            "SELECT photo FROM linktrees WHERE photo IS NOT NULL \
             UNION \
             SELECT icon FROM categories WHERE icon IS NOT NULL \
             UNION \
             SELECT image FROM users WHERE image IS NOT NULL \
             UNION \
             SELECT featured_image FROM articles WHERE featured_image IS NOT NULL",
        )
        .fetch_all(pool)
        .await?;

        let html_documents = sqlx::query_scalar::<_, String>(
            "SELECT content FROM articles WHERE content ILIKE '%<img%'",
        )
        .fetch_all(pool)
        .await?;

        Ok(UploadReferences {
            paths,
            html_documents,
        })
    }
}

//! Blogs table.
//!
//! Tags are a JSONB array of lowercase strings with a GIN index for
//! containment filters.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(BLOGS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS blogs CASCADE; DROP TYPE IF EXISTS blog_status;",
        )
        .await?;
        Ok(())
    }
}

const BLOGS_SQL: &str = r#"
CREATE TYPE blog_status AS ENUM ('draft', 'published', 'archived');

CREATE TABLE blogs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(200) NOT NULL,
    slug VARCHAR(200) NOT NULL,
    excerpt VARCHAR(500),
    content TEXT NOT NULL,
    author VARCHAR(100) NOT NULL,
    tags JSONB NOT NULL DEFAULT '[]'::jsonb,
    status blog_status NOT NULL DEFAULT 'draft',
    featured_image TEXT,
    meta_title VARCHAR(70),
    meta_description VARCHAR(160),
    meta_keywords VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    published_at TIMESTAMPTZ,
    CONSTRAINT uq_blogs_slug UNIQUE (slug),
    CONSTRAINT chk_blogs_slug_format CHECK (slug ~ '^[a-z0-9]+(-[a-z0-9]+)*$'),
    CONSTRAINT chk_blogs_tags_array CHECK (jsonb_typeof(tags) = 'array'),
    CONSTRAINT chk_blogs_published_at CHECK (status <> 'published' OR published_at IS NOT NULL)
);

-- Public listing: newest published first
CREATE INDEX idx_blogs_status_published ON blogs(status, published_at DESC);

-- Admin listing
CREATE INDEX idx_blogs_created ON blogs(created_at DESC);

-- Tag containment (tags @> '["gst"]')
CREATE INDEX idx_blogs_tags ON blogs USING GIN (tags);
"#;

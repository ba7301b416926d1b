//! Database seeder for RegDesk development and testing.
//!
//! Seeds a handful of blog posts through the blog service so they pass the
//! same validation as admin-created posts. Existing slugs are skipped.
//!
//! Usage:
//!   seeder                        - Seed sample blog posts (needs DATABASE_URL)
//!   seeder hash-password <pass>   - Print an Argon2id hash for `admin.password_hash`

use std::sync::Arc;

use anyhow::{Context, bail};
use regdesk_core::auth::hash_password;
use regdesk_core::blog::{BlogError, BlogService, BlogStatus, CreatePostInput};
use regdesk_db::BlogRepository;

struct SamplePost {
    title: &'static str,
    tags: &'static [&'static str],
    status: BlogStatus,
    content: &'static str,
}

const SAMPLE_POSTS: &[SamplePost] = &[
    SamplePost {
        title: "How to Register a Private Limited Company in India",
        tags: &["company-registration", "startups", "mca"],
        status: BlogStatus::Published,
        content: "<p>A private limited company is the most common structure for funded \
                  startups. Registration runs through the SPICe+ form on the MCA portal \
                  and covers name reservation, incorporation, PAN and TAN in one go.</p>\
                  <h2>Documents</h2><p>Identity and address proof for every director, \
                  a registered office proof, and the memorandum and articles.</p>",
    },
    SamplePost {
        title: "GST Registration: Thresholds and Deadlines",
        tags: &["gst", "compliance"],
        status: BlogStatus::Published,
        content: "<p>Suppliers of goods must register once turnover crosses 40 lakh, \
                  service providers at 20 lakh. Inter-state suppliers and e-commerce \
                  sellers must register regardless of turnover.</p>",
    },
    SamplePost {
        title: "Choosing Between the Old and New Tax Regime",
        tags: &["income-tax", "salary", "compliance"],
        status: BlogStatus::Published,
        content: "<p>The new regime offers lower slab rates and a larger rebate but drops \
                  most deductions. If your 80C, HRA and home-loan deductions are large, \
                  the old regime may still come out ahead.</p>",
    },
    SamplePost {
        title: "TDS on Rent and Professional Fees",
        tags: &["tds", "compliance"],
        status: BlogStatus::Published,
        content: "<p>Rent above 2.4 lakh a year attracts TDS under section 194-I, and \
                  professional fees above 30,000 under section 194J.</p>",
    },
    SamplePost {
        title: "LLP vs Private Limited: Which Fits Your Business",
        tags: &["company-registration", "llp"],
        status: BlogStatus::Draft,
        content: "<p>Draft comparing compliance costs, fundraising, and liability.</p>",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => seed().await,
        [cmd, password] if cmd == "hash-password" => {
            println!("{}", hash_password(password)?);
            Ok(())
        }
        _ => bail!("usage: seeder [hash-password <password>]"),
    }
}

async fn seed() -> anyhow::Result<()> {
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = regdesk_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let service = BlogService::new(Arc::new(BlogRepository::new(db)));

    println!("Seeding blog posts...");
    for sample in SAMPLE_POSTS {
        let input = CreatePostInput {
            title: sample.title.to_string(),
            content: sample.content.to_string(),
            author: "RegDesk Team".to_string(),
            tags: sample.tags.iter().map(ToString::to_string).collect(),
            status: Some(sample.status),
            ..Default::default()
        };

        match service.create_post(input).await {
            Ok(post) => println!("  Created {} ({})", post.slug, post.status),
            Err(BlogError::DuplicateSlug(slug)) => {
                println!("  {slug} already exists, skipping...");
            }
            Err(e) => return Err(e).context(format!("Failed to seed '{}'", sample.title)),
        }
    }

    println!("Seeding complete!");
    Ok(())
}

use crate::auth::demo_auth::DEMO_USERS;
use crate::db::community_repository::CommunityRepository;
use crate::db::models::{Community, NewDocument, Privacy};
use crate::db::repository::DocumentRepository;
use crate::db::user_repository::UserRepository;
use crate::error::AppError;

/// Community referenced by the demo signed requests.
pub const DEMO_COMMUNITY_ID: i64 = 10;

/// Seed demo users, a community and a few documents.
///
/// Existing records are left alone, so running this on every start is safe.
pub async fn seed_demo_data(
    users: &dyn UserRepository,
    communities: &dyn CommunityRepository,
    documents: &dyn DocumentRepository,
) -> Result<(), AppError> {
    tracing::info!("Starting demo data seeding...");

    for demo in DEMO_USERS {
        if users.find_by_id(demo.id).await?.is_some() {
            tracing::info!("User '{}' already exists, skipping.", demo.username);
            continue;
        }
        users.save(&demo.to_user()).await?;
        tracing::info!("Seeded demo user '{}'", demo.username);
    }

    if communities.find_by_id(DEMO_COMMUNITY_ID).await?.is_none() {
        communities
            .create_or_update(&Community {
                id: DEMO_COMMUNITY_ID,
                name: "Demo Community".to_string(),
            })
            .await?;
        tracing::info!("Seeded demo community {}", DEMO_COMMUNITY_ID);
    }

    let Some(owner) = DEMO_USERS.first() else {
        return Ok(());
    };

    if !documents.list_visible_to(owner.id).await?.is_empty() {
        tracing::info!("Demo documents already present, skipping.");
        return Ok(());
    }

    let demo_docs = [
        (
            "Welcome",
            "Documents marked public are listed for everybody.",
            Privacy::Public,
        ),
        (
            "Private notes",
            "Only the owner can open restricted documents.",
            Privacy::Restricted,
        ),
    ];

    for (name, content, privacy) in demo_docs {
        documents
            .create(NewDocument {
                name: name.to_string(),
                content: content.to_string(),
                privacy,
                owner_id: owner.id,
            })
            .await?;
    }

    tracing::info!("Demo data seeding complete.");
    Ok(())
}

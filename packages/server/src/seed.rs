use sea_orm::*;
use tracing::info;

use crate::entity::group;

/// Create the configured groups if they do not exist yet.
///
/// Groups are only created here; nothing assigns them to new accounts.
pub async fn seed_groups(db: &DatabaseConnection, names: &[String]) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for name in names {
        let model = group::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        };

        let result = group::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(group::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(rows) if rows > 0 => inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new groups", inserted);
    }

    Ok(())
}

//! 模式比对
//!
//! 将实体声明推导出的表结构与数据库文件中实际存在的表结构比较，
//! 用于确认迁移是否已全部应用、是否有手工改动。

use sea_orm::{
    ConnectionTrait, DatabaseBackend, DbErr, EntityTrait, IdenStatic, Iterable,
    Statement,
};
use serde::Serialize;
use std::fmt;

use crate::entity::{games, reviews};

/// 实体声明对应的表结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<String>,
}

/// 模式差异
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaDrift {
    MissingTable { table: String },
    MissingColumn { table: String, column: String },
    UnexpectedColumn { table: String, column: String },
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDrift::MissingTable { table } => write!(f, "缺少表 {}", table),
            SchemaDrift::MissingColumn { table, column } => {
                write!(f, "表 {} 缺少列 {}", table, column)
            }
            SchemaDrift::UnexpectedColumn { table, column } => {
                write!(f, "表 {} 存在未声明的列 {}", table, column)
            }
        }
    }
}

fn table_spec<E>() -> TableSpec
where
    E: EntityTrait,
{
    TableSpec {
        name: E::default().table_name().to_string(),
        columns: E::Column::iter()
            .map(|column| column.as_str().to_string())
            .collect(),
    }
}

/// 由实体声明推导出的全部表结构（父表在前）
pub fn expected_tables() -> Vec<TableSpec> {
    vec![table_spec::<games::Entity>(), table_spec::<reviews::Entity>()]
}

async fn live_tables<C>(db: &C) -> Result<Vec<String>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        ))
        .await?;
    rows.iter().map(|row| row.try_get::<String>("", "name")).collect()
}

async fn live_columns<C>(db: &C, table: &str) -> Result<Vec<String>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = db
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM pragma_table_info(?) ORDER BY cid",
            [table.into()],
        ))
        .await?;
    rows.iter().map(|row| row.try_get::<String>("", "name")).collect()
}

/// 比较实体声明与数据库实际结构，返回空列表表示一致
pub async fn diff_schema<C>(db: &C) -> Result<Vec<SchemaDrift>, DbErr>
where
    C: ConnectionTrait,
{
    let live = live_tables(db).await?;
    let mut drift = Vec::new();

    for spec in expected_tables() {
        if !live.contains(&spec.name) {
            drift.push(SchemaDrift::MissingTable { table: spec.name });
            continue;
        }

        let columns = live_columns(db, &spec.name).await?;
        for column in &spec.columns {
            if !columns.contains(column) {
                drift.push(SchemaDrift::MissingColumn {
                    table: spec.name.clone(),
                    column: column.clone(),
                });
            }
        }
        for column in columns {
            if !spec.columns.contains(&column) {
                drift.push(SchemaDrift::UnexpectedColumn {
                    table: spec.name.clone(),
                    column,
                });
            }
        }
    }

    Ok(drift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{empty_memory_db, memory_db};
    use migration::{Migrator, MigratorTrait};

    #[test]
    fn expected_tables_follow_entity_declarations() {
        let tables = expected_tables();
        assert_eq!(tables[0].name, "games");
        assert_eq!(tables[0].columns, ["id", "title", "genre", "platform", "price"]);
        assert_eq!(tables[1].name, "reviews");
        assert_eq!(tables[1].columns, ["id", "score", "comment", "game_id"]);
    }

    #[tokio::test]
    async fn unmigrated_database_is_missing_both_tables() {
        let db = empty_memory_db().await;
        let drift = diff_schema(&db).await.unwrap();
        assert_eq!(
            drift,
            [
                SchemaDrift::MissingTable {
                    table: "games".into()
                },
                SchemaDrift::MissingTable {
                    table: "reviews".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn migrated_database_matches_entities() {
        let db = memory_db().await;
        assert!(diff_schema(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rolling_back_reviews_is_detected() {
        let db = memory_db().await;
        Migrator::down(&db, Some(1)).await.unwrap();

        let drift = diff_schema(&db).await.unwrap();
        assert_eq!(
            drift,
            [SchemaDrift::MissingTable {
                table: "reviews".into()
            }]
        );
    }

    #[tokio::test]
    async fn hand_added_column_is_reported() {
        let db = memory_db().await;
        db.execute_unprepared("ALTER TABLE games ADD COLUMN rating INTEGER")
            .await
            .unwrap();

        let drift = diff_schema(&db).await.unwrap();
        assert_eq!(
            drift,
            [SchemaDrift::UnexpectedColumn {
                table: "games".into(),
                column: "rating".into()
            }]
        );
        assert_eq!(drift[0].to_string(), "表 games 存在未声明的列 rating");
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn select_for(kind: &str, seasons: &str) -> String {
    format!(
        "SELECT
            '{kind}' AS media_type,
            p.{kind}_id AS source_id,
            p.title,
            p.release_year,
            p.age_certification,
            p.runtime,
            {seasons} AS seasons,
            g.name AS genre,
            c.code AS country,
            d.name AS director,
            a.name AS actor,
            ch.name AS character_name,
            r.score AS imdb_score,
            r.votes AS imdb_votes
        FROM {kind}s p
        LEFT JOIN {kind}_genres lg ON lg.{kind}_id = p.id
        LEFT JOIN genres g ON g.id = lg.genre_id
        LEFT JOIN {kind}_countries lc ON lc.{kind}_id = p.id
        LEFT JOIN countries c ON c.id = lc.country_id
        LEFT JOIN {kind}_credits dc ON dc.{kind}_id = p.id AND dc.role = 'director'
        LEFT JOIN people d ON d.id = dc.person_id
        LEFT JOIN {kind}_credits ac ON ac.{kind}_id = p.id AND ac.role = 'actor'
        LEFT JOIN people a ON a.id = ac.person_id
        LEFT JOIN {kind}_characters lch ON lch.{kind}_id = p.id AND lch.person_id = ac.person_id
        LEFT JOIN characters ch ON ch.id = lch.character_id
        LEFT JOIN ratings r ON r.{kind}_id = p.id AND r.source = 'imdb'"
    )
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        let sql = format!(
            "CREATE VIEW IF NOT EXISTS media_view AS {} UNION ALL {}",
            select_for("movie", "NULL"),
            select_for("show", "p.seasons"),
        );

        conn.execute_unprepared(&sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP VIEW IF EXISTS media_view")
            .await?;
        Ok(())
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS profiles (
                id SERIAL PRIMARY KEY,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                first_name VARCHAR(100) NULL,
                last_name VARCHAR(100) NULL,
                email VARCHAR(255) NULL,
                phone VARCHAR(50) NULL,
                location VARCHAR(255) NULL,
                bio TEXT NULL,
                profile_picture VARCHAR(500) NULL,
                cv VARCHAR(500) NULL,
                recruiter_experience VARCHAR(50) NULL,
                company_name VARCHAR(255) NULL,
                company_description TEXT NULL,
                company_website VARCHAR(500) NULL,
                company_email VARCHAR(255) NULL,
                company_logo VARCHAR(500) NULL,
                skills JSONB NOT NULL DEFAULT '[]'::jsonb,
                job_preferences JSONB NOT NULL DEFAULT '[]'::jsonb,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                completed_at TIMESTAMP NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS profiles").await?;
        Ok(())
    }
}

//! The shipped migration history.
//!
//! Ids are the authoring timestamps and are frozen: entries are never
//! renumbered, reordered, or edited once released. New schema work gets a
//! new entry at the end.

use async_trait::async_trait;
use sqlx::PgConnection;

use super::Migration;

/// All migrations, oldest first.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(Initial),
        Box::new(RenameDeploymentsToConfigurations),
        Box::new(MakeUserEmailUnique),
        Box::new(ExtendFilesAndBlobs),
        Box::new(UseTimezoneForDateColumns),
        Box::new(ChangeMimeTypeToFileExtension),
        Box::new(AddDocIdToFiles),
        Box::new(AddConfigurationUserRelation),
        Box::new(NormalizeMessageSources),
        Box::new(AddExtensionExternalId),
        Box::new(AddParentIdToMessages),
    ]
}

async fn run_batch(conn: &mut PgConnection, statements: &[&str]) -> Result<(), sqlx::Error> {
    for sql in statements {
        sqlx::query(sql).execute(&mut *conn).await?;
    }
    Ok(())
}

struct Initial;

#[async_trait]
impl Migration for Initial {
    fn id(&self) -> i64 {
        1722419098898
    }

    fn name(&self) -> &'static str {
        "initial"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        // make sure the initial migration won't run against an existing database
        let existing: Option<String> =
            sqlx::query_scalar("SELECT to_regclass('public.extensions')::text")
                .fetch_one(&mut *conn)
                .await?;
        if existing.is_some() {
            return Ok(());
        }

        run_batch(conn, &[
            r#"CREATE TABLE "user-groups" ("id" character varying NOT NULL, "name" character varying(100) NOT NULL, "isAdmin" boolean NOT NULL DEFAULT false, "isBuiltIn" boolean NOT NULL DEFAULT false, "monthlyTokens" integer, "monthlyUserTokens" integer, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_user_groups" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "users" ("id" character varying NOT NULL, "name" character varying(100) NOT NULL, "email" character varying(100) NOT NULL, "apiKey" character varying(100), "passwordHash" character varying, "userGroupId" character varying, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_users" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "deployments" ("id" SERIAL NOT NULL, "name" character varying NOT NULL, "enabled" boolean NOT NULL, "agentName" text, "chatFooter" text, "chatSuggestions" json, "executorEndpoint" text, "executorHeaders" text, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_deployments" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "extensions" ("id" SERIAL NOT NULL, "name" character varying NOT NULL, "enabled" boolean NOT NULL, "values" json NOT NULL, "deploymentId" integer NOT NULL, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_extensions" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "conversations" ("id" SERIAL NOT NULL, "name" character varying, "isNameSetManually" boolean NOT NULL DEFAULT false, "llm" character varying, "rating" character varying, "deploymentId" integer NOT NULL, "userId" character varying NOT NULL, "context" json, "extensionUserArguments" json, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_conversations" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "messages" ("id" SERIAL NOT NULL, "type" character varying NOT NULL, "data" json NOT NULL, "rating" character varying, "error" character varying, "tools" json, "debug" json, "sources" json, "conversationId" integer NOT NULL, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_messages" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "bucket" ("id" SERIAL NOT NULL, "name" character varying NOT NULL, "endpoint" character varying NOT NULL, "headers" character varying, "isDefault" boolean NOT NULL, "perUserQuota" integer NOT NULL DEFAULT 20, "allowedFileTypes" text[], "fileSizeLimits" json, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_bucket" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "files" ("id" SERIAL NOT NULL, "mimeType" character varying NOT NULL, "fileSize" integer NOT NULL, "fileName" character varying NOT NULL, "userId" character varying, "bucketId" integer NOT NULL, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_files" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "settings" ("id" SERIAL NOT NULL, "language" character varying(2), "name" character varying(30), "primaryColor" character varying(20), "primaryContentColor" character varying(20), "welcomeText" text, "customCss" text, "agentName" text, "chatFooter" text, "chatSuggestions" json, "siteLinks" json, "logo" text, "backgroundLogo" text, "avatarLogo" text, "createdAt" TIMESTAMP NOT NULL DEFAULT now(), "updatedAt" TIMESTAMP NOT NULL DEFAULT now(), CONSTRAINT "PK_settings" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "blobs" ("id" character varying NOT NULL, "type" character varying NOT NULL, "buffer" bytea NOT NULL, CONSTRAINT "PK_blobs" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "sessions" ("id" character varying NOT NULL, "value" text NOT NULL, CONSTRAINT "PK_sessions" PRIMARY KEY ("id"))"#,
            r#"CREATE TABLE "usages" ("date" TIMESTAMP NOT NULL, "userId" character varying NOT NULL, "userGroup" character varying NOT NULL, "counter" character varying NOT NULL, "key" character varying NOT NULL, "subKey" character varying NOT NULL, "count" integer NOT NULL, CONSTRAINT "PK_usages" PRIMARY KEY ("date", "userId", "userGroup", "counter", "key", "subKey"))"#,
            r#"CREATE TABLE "deployments_user_groups_user-groups" ("deploymentsId" integer NOT NULL, "userGroupsId" character varying NOT NULL, CONSTRAINT "PK_deployments_user_groups" PRIMARY KEY ("deploymentsId", "userGroupsId"))"#,
            r#"CREATE INDEX "IDX_deployments_user_groups_deployment" ON "deployments_user_groups_user-groups" ("deploymentsId")"#,
            r#"CREATE INDEX "IDX_deployments_user_groups_group" ON "deployments_user_groups_user-groups" ("userGroupsId")"#,
            r#"ALTER TABLE "extensions" ADD CONSTRAINT "FK_extensions_deployment" FOREIGN KEY ("deploymentId") REFERENCES "deployments"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "messages" ADD CONSTRAINT "FK_messages_conversation" FOREIGN KEY ("conversationId") REFERENCES "conversations"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "conversations" ADD CONSTRAINT "FK_conversations_user" FOREIGN KEY ("userId") REFERENCES "users"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "files" ADD CONSTRAINT "FK_files_user" FOREIGN KEY ("userId") REFERENCES "users"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "files" ADD CONSTRAINT "FK_files_bucket" FOREIGN KEY ("bucketId") REFERENCES "bucket"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "users" ADD CONSTRAINT "FK_users_user_group" FOREIGN KEY ("userGroupId") REFERENCES "user-groups"("id") ON DELETE NO ACTION ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "deployments_user_groups_user-groups" ADD CONSTRAINT "FK_deployments_user_groups_deployment" FOREIGN KEY ("deploymentsId") REFERENCES "deployments"("id") ON DELETE CASCADE ON UPDATE CASCADE"#,
            r#"ALTER TABLE "deployments_user_groups_user-groups" ADD CONSTRAINT "FK_deployments_user_groups_group" FOREIGN KEY ("userGroupsId") REFERENCES "user-groups"("id") ON DELETE CASCADE ON UPDATE CASCADE"#,
        ]).await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "deployments_user_groups_user-groups" DROP CONSTRAINT "FK_deployments_user_groups_group""#,
            r#"ALTER TABLE "deployments_user_groups_user-groups" DROP CONSTRAINT "FK_deployments_user_groups_deployment""#,
            r#"ALTER TABLE "users" DROP CONSTRAINT "FK_users_user_group""#,
            r#"ALTER TABLE "files" DROP CONSTRAINT "FK_files_bucket""#,
            r#"ALTER TABLE "files" DROP CONSTRAINT "FK_files_user""#,
            r#"ALTER TABLE "conversations" DROP CONSTRAINT "FK_conversations_user""#,
            r#"ALTER TABLE "messages" DROP CONSTRAINT "FK_messages_conversation""#,
            r#"ALTER TABLE "extensions" DROP CONSTRAINT "FK_extensions_deployment""#,
            r#"DROP INDEX "public"."IDX_deployments_user_groups_group""#,
            r#"DROP INDEX "public"."IDX_deployments_user_groups_deployment""#,
            r#"DROP TABLE "deployments_user_groups_user-groups""#,
            r#"DROP TABLE "usages""#,
            r#"DROP TABLE "sessions""#,
            r#"DROP TABLE "blobs""#,
            r#"DROP TABLE "settings""#,
            r#"DROP TABLE "files""#,
            r#"DROP TABLE "bucket""#,
            r#"DROP TABLE "messages""#,
            r#"DROP TABLE "conversations""#,
            r#"DROP TABLE "extensions""#,
            r#"DROP TABLE "deployments""#,
            r#"DROP TABLE "users""#,
            r#"DROP TABLE "user-groups""#,
        ])
        .await
    }
}

struct RenameDeploymentsToConfigurations;

#[async_trait]
impl Migration for RenameDeploymentsToConfigurations {
    fn id(&self) -> i64 {
        1727169611944
    }

    fn name(&self) -> &'static str {
        "renameDeploymentsToConfigurations"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "deployments" RENAME TO "configurations""#,
            r#"ALTER TABLE "extensions" RENAME COLUMN "deploymentId" TO "configurationId""#,
            r#"ALTER TABLE "conversations" RENAME COLUMN "deploymentId" TO "configurationId""#,
            r#"ALTER TABLE "deployments_user_groups_user-groups" RENAME TO "configurations_user_groups_user-groups""#,
            r#"ALTER TABLE "configurations_user_groups_user-groups" RENAME COLUMN "deploymentsId" TO "configurationsId""#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "configurations_user_groups_user-groups" RENAME COLUMN "configurationsId" TO "deploymentsId""#,
            r#"ALTER TABLE "configurations_user_groups_user-groups" RENAME TO "deployments_user_groups_user-groups""#,
            r#"ALTER TABLE "conversations" RENAME COLUMN "configurationId" TO "deploymentId""#,
            r#"ALTER TABLE "extensions" RENAME COLUMN "configurationId" TO "deploymentId""#,
            r#"ALTER TABLE "configurations" RENAME TO "deployments""#,
        ])
        .await
    }
}

struct MakeUserEmailUnique;

#[async_trait]
impl Migration for MakeUserEmailUnique {
    fn id(&self) -> i64 {
        1739445681819
    }

    fn name(&self) -> &'static str {
        "makeUserEmailUnique"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "users" ADD CONSTRAINT "UQ_users_email" UNIQUE ("email")"#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[r#"ALTER TABLE "users" DROP CONSTRAINT "UQ_users_email""#]).await
    }
}

struct ExtendFilesAndBlobs;

#[async_trait]
impl Migration for ExtendFilesAndBlobs {
    fn id(&self) -> i64 {
        1740589058121
    }

    fn name(&self) -> &'static str {
        "extendFilesAndBlobs"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "files" ADD "extensionId" integer"#,
            r#"ALTER TABLE "files" ADD "conversationId" integer"#,
            r#"ALTER TABLE "files" ADD "uploadStatus" character varying NOT NULL DEFAULT 'successful'"#,
            r#"ALTER TABLE "files" ALTER COLUMN "bucketId" DROP NOT NULL"#,
            r#"ALTER TABLE "files" DROP CONSTRAINT "FK_files_bucket""#,
            r#"ALTER TABLE "files" ADD CONSTRAINT "FK_files_bucket" FOREIGN KEY ("bucketId") REFERENCES "bucket"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "files" ADD CONSTRAINT "FK_files_extension" FOREIGN KEY ("extensionId") REFERENCES "extensions"("id") ON DELETE SET NULL ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "files" ADD CONSTRAINT "FK_files_conversation" FOREIGN KEY ("conversationId") REFERENCES "conversations"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "blobs" ADD "fileId" integer"#,
            r#"ALTER TABLE "blobs" ADD "category" character varying"#,
            r#"ALTER TABLE "blobs" ADD CONSTRAINT "FK_blobs_file" FOREIGN KEY ("fileId") REFERENCES "files"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "blobs" DROP CONSTRAINT "FK_blobs_file""#,
            r#"ALTER TABLE "blobs" DROP COLUMN "category""#,
            r#"ALTER TABLE "blobs" DROP COLUMN "fileId""#,
            r#"ALTER TABLE "files" DROP CONSTRAINT "FK_files_conversation""#,
            r#"ALTER TABLE "files" DROP CONSTRAINT "FK_files_extension""#,
            r#"ALTER TABLE "files" DROP CONSTRAINT "FK_files_bucket""#,
            r#"ALTER TABLE "files" ALTER COLUMN "bucketId" SET NOT NULL"#,
            r#"ALTER TABLE "files" ADD CONSTRAINT "FK_files_bucket" FOREIGN KEY ("bucketId") REFERENCES "bucket"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "files" DROP COLUMN "uploadStatus""#,
            r#"ALTER TABLE "files" DROP COLUMN "conversationId""#,
            r#"ALTER TABLE "files" DROP COLUMN "extensionId""#,
        ])
        .await
    }
}

struct UseTimezoneForDateColumns;

#[async_trait]
impl Migration for UseTimezoneForDateColumns {
    fn id(&self) -> i64 {
        1740738432560
    }

    fn name(&self) -> &'static str {
        "useTimezoneForDateColumns"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let mut statements = vec![r#"SET timezone = 'UTC'"#.to_string()];
        for table in TIMESTAMPED_TABLES {
            statements.push(format!(
                r#"ALTER TABLE "{table}" ALTER COLUMN "createdAt" TYPE TIMESTAMPTZ"#
            ));
            statements.push(format!(
                r#"ALTER TABLE "{table}" ALTER COLUMN "updatedAt" TYPE TIMESTAMPTZ"#
            ));
        }
        statements.push(r#"ALTER TABLE "usages" ALTER COLUMN "date" TYPE TIMESTAMPTZ"#.to_string());

        let refs: Vec<&str> = statements.iter().map(String::as_str).collect();
        run_batch(conn, &refs).await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let mut statements = Vec::new();
        for table in TIMESTAMPED_TABLES {
            statements.push(format!(
                r#"ALTER TABLE "{table}" ALTER COLUMN "createdAt" TYPE TIMESTAMP"#
            ));
            statements.push(format!(
                r#"ALTER TABLE "{table}" ALTER COLUMN "updatedAt" TYPE TIMESTAMP"#
            ));
        }
        statements.push(r#"ALTER TABLE "usages" ALTER COLUMN "date" TYPE TIMESTAMP"#.to_string());

        let refs: Vec<&str> = statements.iter().map(String::as_str).collect();
        run_batch(conn, &refs).await
    }
}

const TIMESTAMPED_TABLES: &[&str] = &[
    "bucket",
    "configurations",
    "conversations",
    "extensions",
    "files",
    "messages",
    "settings",
    "user-groups",
    "users",
];

struct ChangeMimeTypeToFileExtension;

#[async_trait]
impl Migration for ChangeMimeTypeToFileExtension {
    fn id(&self) -> i64 {
        1744018948469
    }

    fn name(&self) -> &'static str {
        "changeMimeTypeToFileExtension"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"CREATE TEMP TABLE file_type_mappings (value TEXT, label TEXT)"#,
            mapping_rows_sql(false),
            r#"UPDATE "extensions"
               SET "values" = jsonb_set(
                   "values"::jsonb,
                   '{fileNameExtensions}',
                   (
                       SELECT jsonb_agg(COALESCE(ftm.label, ft))
                       FROM jsonb_array_elements_text("values"::jsonb->'fileTypes') AS ft
                       LEFT JOIN file_type_mappings ftm ON ft = ftm.value
                   )
               )::json
               WHERE "values"::jsonb ? 'fileTypes'"#,
            r#"UPDATE "extensions"
               SET "values" = ("values"::jsonb - 'fileTypes')::json
               WHERE "values"::jsonb ? 'fileTypes'"#,
            r#"ALTER TABLE "bucket" ADD COLUMN "allowedFileNameExtensions" text[]"#,
            r#"UPDATE "bucket"
               SET "allowedFileNameExtensions" = ARRAY(
                   SELECT DISTINCT COALESCE(ftm.label, ft)
                   FROM unnest("allowedFileTypes") AS ft
                   LEFT JOIN file_type_mappings ftm ON ft = ftm.value
               )
               WHERE "allowedFileTypes" IS NOT NULL"#,
            r#"ALTER TABLE "bucket" DROP COLUMN "allowedFileTypes""#,
            r#"DROP TABLE file_type_mappings"#,
        ])
        .await
    }

    // Reverse maps extensions back through the same table. Aliased MIME
    // types collapse to one entry (e.g. audio/mpeg and audio/mp3 both map
    // to .mp3 going forward), so the reverse is an approximation.
    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"CREATE TEMP TABLE file_type_mappings (value TEXT, label TEXT)"#,
            mapping_rows_sql(true),
            r#"UPDATE "extensions"
               SET "values" = jsonb_set(
                   "values"::jsonb,
                   '{fileTypes}',
                   (
                       SELECT jsonb_agg(COALESCE(ftm.label, ft))
                       FROM jsonb_array_elements_text("values"::jsonb->'fileNameExtensions') AS ft
                       LEFT JOIN file_type_mappings ftm ON ft = ftm.value
                   )
               )::json
               WHERE "values"::jsonb ? 'fileNameExtensions'"#,
            r#"UPDATE "extensions"
               SET "values" = ("values"::jsonb - 'fileNameExtensions')::json
               WHERE "values"::jsonb ? 'fileNameExtensions'"#,
            r#"ALTER TABLE "bucket" ADD COLUMN "allowedFileTypes" text[]"#,
            r#"UPDATE "bucket"
               SET "allowedFileTypes" = ARRAY(
                   SELECT DISTINCT COALESCE(ftm.label, ft)
                   FROM unnest("allowedFileNameExtensions") AS ft
                   LEFT JOIN file_type_mappings ftm ON ft = ftm.value
               )
               WHERE "allowedFileNameExtensions" IS NOT NULL"#,
            r#"ALTER TABLE "bucket" DROP COLUMN "allowedFileNameExtensions""#,
            r#"DROP TABLE file_type_mappings"#,
        ])
        .await
    }
}

/// MIME type to file-name extension pairs. `reversed` swaps the columns
/// for the down direction; duplicate targets there pick the first match.
fn mapping_rows_sql(reversed: bool) -> &'static str {
    if reversed {
        r#"INSERT INTO file_type_mappings (value, label) VALUES
             ('.pdf', 'application/pdf'),
             ('.md', 'text/markdown'),
             ('.html', 'text/html'),
             ('.htm', 'text/html'),
             ('.js', 'application/javascript'),
             ('.py', 'text/x-python'),
             ('.rs', 'text/rust'),
             ('.json', 'application/json'),
             ('.xml', 'application/xml'),
             ('.yml', 'application/yaml'),
             ('.yaml', 'application/yaml'),
             ('.txt', 'text/plain'),
             ('.xlsx', 'application/vnd.openxmlformats-officedocument.spreadsheetml.sheet'),
             ('.docx', 'application/vnd.openxmlformats-officedocument.wordprocessingml.document'),
             ('.pptx', 'application/vnd.openxmlformats-officedocument.presentationml.presentation'),
             ('.png', 'image/png'),
             ('.jpeg', 'image/jpeg'),
             ('.jpg', 'image/jpg'),
             ('.webp', 'image/webp'),
             ('.mp3', 'audio/mp3'),
             ('.m4a', 'audio/m4a'),
             ('.ogg', 'audio/ogg'),
             ('.flac', 'audio/flac')"#
    } else {
        r#"INSERT INTO file_type_mappings (value, label) VALUES
             ('application/pdf', '.pdf'),
             ('text/markdown', '.md'),
             ('text/html', '.html'),
             ('application/javascript', '.js'),
             ('text/x-python', '.py'),
             ('text/rust', '.rs'),
             ('application/json', '.json'),
             ('application/xml', '.xml'),
             ('text/xml', '.xml'),
             ('application/yaml', '.yml'),
             ('text/plain', '.txt'),
             ('application/vnd.openxmlformats-officedocument.spreadsheetml.sheet', '.xlsx'),
             ('application/vnd.openxmlformats-officedocument.wordprocessingml.document', '.docx'),
             ('application/vnd.openxmlformats-officedocument.presentationml.presentation', '.pptx'),
             ('image/png', '.png'),
             ('image/jpeg', '.jpeg'),
             ('image/jpg', '.jpg'),
             ('image/webp', '.webp'),
             ('audio/mp3', '.mp3'),
             ('audio/mpeg', '.mp3'),
             ('audio/m4a', '.m4a'),
             ('audio/x-m4a', '.m4a'),
             ('audio/ogg', '.ogg'),
             ('audio/flac', '.flac')"#
    }
}

struct AddDocIdToFiles;

#[async_trait]
impl Migration for AddDocIdToFiles {
    fn id(&self) -> i64 {
        1744643609027
    }

    fn name(&self) -> &'static str {
        "addColumnDocIdToFiles"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "files" ADD "docId" integer"#,
            r#"CREATE FUNCTION set_default_doc_id() RETURNS trigger AS $$
               BEGIN
                   IF NEW."docId" IS NULL THEN
                       NEW."docId" := NEW."id";
                   END IF;
                   RETURN NEW;
               END;
               $$ LANGUAGE plpgsql"#,
            r#"CREATE TRIGGER set_default_doc_id_trigger BEFORE INSERT ON "files" FOR EACH ROW EXECUTE FUNCTION set_default_doc_id()"#,
            r#"UPDATE "files" SET "docId" = "id" WHERE "docId" IS NULL"#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"DROP TRIGGER set_default_doc_id_trigger ON "files""#,
            r#"DROP FUNCTION set_default_doc_id"#,
            r#"ALTER TABLE "files" DROP COLUMN "docId""#,
        ])
        .await
    }
}

struct AddConfigurationUserRelation;

#[async_trait]
impl Migration for AddConfigurationUserRelation {
    fn id(&self) -> i64 {
        1745490114806
    }

    fn name(&self) -> &'static str {
        "addConfigurationUserRelation"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"CREATE TABLE "configurations_users" ("id" SERIAL NOT NULL, "configurationId" integer NOT NULL, "userId" character varying NOT NULL, "isDefault" boolean NOT NULL DEFAULT false, "values" json NOT NULL, CONSTRAINT "PK_configurations_users" PRIMARY KEY ("id"), CONSTRAINT "UQ_configurations_users" UNIQUE ("userId", "configurationId", "isDefault"))"#,
            r#"ALTER TABLE "configurations_users" ADD CONSTRAINT "FK_configurations_users_configuration" FOREIGN KEY ("configurationId") REFERENCES "configurations"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
            r#"ALTER TABLE "configurations_users" ADD CONSTRAINT "FK_configurations_users_user" FOREIGN KEY ("userId") REFERENCES "users"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "configurations_users" DROP CONSTRAINT "FK_configurations_users_user""#,
            r#"ALTER TABLE "configurations_users" DROP CONSTRAINT "FK_configurations_users_configuration""#,
            r#"DROP TABLE "configurations_users""#,
        ])
        .await
    }
}

struct NormalizeMessageSources;

#[async_trait]
impl Migration for NormalizeMessageSources {
    fn id(&self) -> i64 {
        1750134137266
    }

    fn name(&self) -> &'static str {
        "normalizeMessageSources"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"CREATE OR REPLACE FUNCTION normalize_message_sources() RETURNS void AS
               $$
               DECLARE
                   message_record RECORD;
                   old_sources    JSONB;
                   source         JSONB;
                   pages          JSONB;
                   normalized     JSONB;
                   new_sources    JSONB;
                   page_value     TEXT;
                   start_page     INTEGER;
                   end_page       INTEGER;
                   i              INTEGER;
                   k              INTEGER;
                   p              INTEGER;
               BEGIN
                   FOR message_record IN SELECT id, sources FROM messages WHERE sources IS NOT NULL
                       LOOP
                           old_sources := message_record.sources::jsonb;

                           IF jsonb_typeof(old_sources) <> 'array' OR jsonb_array_length(old_sources) = 0 THEN
                               CONTINUE;
                           END IF;

                           new_sources := '[]'::jsonb;

                           FOR i IN 0..jsonb_array_length(old_sources) - 1
                               LOOP
                                   source := old_sources -> i;
                                   pages := source -> 'chunk' -> 'pages';

                                   IF jsonb_typeof(pages) = 'array' THEN
                                       normalized := '[]'::jsonb;
                                       FOR k IN 0..jsonb_array_length(pages) - 1
                                           LOOP
                                               page_value := pages ->> k;

                                               IF page_value ~ '^[0-9]+-[0-9]+$' THEN
                                                   start_page := (regexp_match(page_value, '^([0-9]+)-[0-9]+$'))[1]::integer;
                                                   end_page := (regexp_match(page_value, '^[0-9]+-([0-9]+)$'))[1]::integer;
                                                   FOR p IN start_page..end_page
                                                       LOOP
                                                           normalized := normalized || jsonb_build_array(p);
                                                       END LOOP;
                                               ELSIF page_value ~ '^[0-9]+$' THEN
                                                   normalized := normalized || jsonb_build_array(page_value::integer);
                                               ELSE
                                                   normalized := normalized || jsonb_build_array(pages -> k);
                                               END IF;
                                           END LOOP;
                                       source := jsonb_set(source, '{chunk,pages}', normalized);
                                   ELSIF jsonb_typeof(pages) = 'number' THEN
                                       source := jsonb_set(source, '{chunk,pages}', jsonb_build_array(pages));
                                   ELSIF jsonb_typeof(pages) = 'string' THEN
                                       page_value := pages #>> '{}';
                                       IF page_value ~ '^[0-9]+$' THEN
                                           source := jsonb_set(source, '{chunk,pages}', jsonb_build_array(page_value::integer));
                                       ELSE
                                           source := jsonb_set(source, '{chunk,pages}', 'null'::jsonb);
                                       END IF;
                                   END IF;

                                   new_sources := new_sources || jsonb_build_array(source);
                               END LOOP;

                           UPDATE messages SET sources = new_sources::json WHERE id = message_record.id;
                       END LOOP;
               END;
               $$ LANGUAGE plpgsql"#,
            r#"SELECT normalize_message_sources()"#,
            r#"DROP FUNCTION normalize_message_sources()"#,
        ])
        .await
    }

    async fn down(&self, _conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        // Lossy: the textual page ranges the normalization consumed cannot
        // be reconstructed, so there is nothing to restore.
        Ok(())
    }
}

struct AddExtensionExternalId;

#[async_trait]
impl Migration for AddExtensionExternalId {
    fn id(&self) -> i64 {
        1750147424909
    }

    fn name(&self) -> &'static str {
        "addExtensionExternalId"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "extensions" ADD COLUMN "externalId" character varying"#,
            r#"CREATE FUNCTION set_external_id() RETURNS trigger AS $$
               BEGIN
                   IF NEW."externalId" IS NULL THEN
                       NEW."externalId" := NEW."name" || '_' || NEW."id";
                   END IF;
                   RETURN NEW;
               END;
               $$ LANGUAGE plpgsql"#,
            r#"CREATE TRIGGER set_external_id_trigger BEFORE INSERT ON "extensions" FOR EACH ROW EXECUTE FUNCTION set_external_id()"#,
            r#"UPDATE "extensions" SET "externalId" = "name" || '_' || "id" WHERE "externalId" IS NULL"#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"DROP TRIGGER set_external_id_trigger ON "extensions""#,
            r#"DROP FUNCTION set_external_id()"#,
            r#"ALTER TABLE "extensions" DROP COLUMN "externalId""#,
        ])
        .await
    }
}

struct AddParentIdToMessages;

#[async_trait]
impl Migration for AddParentIdToMessages {
    fn id(&self) -> i64 {
        1751535808685
    }

    fn name(&self) -> &'static str {
        "addParentIdToMessages"
    }

    async fn up(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "messages" ADD "parentId" integer"#,
            r#"ALTER TABLE "messages" ADD CONSTRAINT "FK_messages_parent" FOREIGN KEY ("parentId") REFERENCES "messages"("id") ON DELETE CASCADE ON UPDATE NO ACTION"#,
        ])
        .await
    }

    async fn down(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        run_batch(conn, &[
            r#"ALTER TABLE "messages" DROP CONSTRAINT "FK_messages_parent""#,
            r#"ALTER TABLE "messages" DROP COLUMN "parentId""#,
        ])
        .await
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow, bail};
use blockdoc_config::Config;
use blockdoc_engine::{
    BlockId, Converter, Document, DocumentId, EditorSession, FileGateway, GatewayError,
    PersistenceGateway, SaveOutcome, SchemaRegistry, SessionError, SessionOptions, wire,
};
use serde_json::{Map, Value};

pub struct Context {
    registry: Arc<SchemaRegistry>,
    gateway: Arc<FileGateway>,
    options: SessionOptions,
}

impl Context {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Arc::new(SchemaRegistry::standard()),
            gateway: Arc::new(FileGateway::new(config.store_path.clone())),
            options: SessionOptions {
                autosave_interval: config.autosave_interval(),
                notification_ttl: config.notification_ttl(),
            },
        }
    }

    fn converter(&self) -> Converter {
        Converter::escaping(self.registry.clone())
    }

    async fn open(&self, id: &str) -> Result<EditorSession> {
        let id = DocumentId::parse(id)?;
        let (session, issues) = EditorSession::open(
            id.clone(),
            self.registry.clone(),
            self.gateway.clone(),
            self.converter(),
            self.options.clone(),
        )
        .await
        .with_context(|| format!("opening {id}"))?;
        for issue in issues {
            eprintln!("warning: {issue}");
        }
        Ok(session)
    }
}

fn parse_patch(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text).context("field values must be JSON")? {
        Value::Object(map) => Ok(map),
        _ => bail!("field values must be a JSON object"),
    }
}

/// Save and close, printing per-field problems if the document is invalid
async fn commit(session: EditorSession) -> Result<()> {
    let result = session.save().await;
    session.close().await?;
    match result {
        Ok(SaveOutcome::Saved { version }) => {
            println!("saved version {version}");
            Ok(())
        }
        Ok(SaveOutcome::Unchanged) => {
            println!("nothing to save");
            Ok(())
        }
        Err(SessionError::ValidationFailed(report)) => {
            eprintln!("{report}");
            bail!("document not saved")
        }
        Err(err) => Err(err.into()),
    }
}

pub fn types(ctx: &Context) -> Result<()> {
    for schema in ctx.registry.schemas() {
        match schema.family() {
            Some(family) => println!("{:<16} {} ({family})", schema.type_id(), schema.label()),
            None => println!("{:<16} {}", schema.type_id(), schema.label()),
        }
    }
    Ok(())
}

pub async fn new(ctx: &Context, id: &str) -> Result<()> {
    let id = DocumentId::parse(id)?;
    match ctx.gateway.load(&id).await {
        Ok(_) => bail!("document {id} already exists"),
        Err(GatewayError::NotFound(_)) => {}
        Err(err) => return Err(err.into()),
    }

    let payload = wire::serialize(&Document::new(id.clone()))?;
    ctx.gateway.save(&id, &payload).await?;
    println!("created {}", ctx.gateway.path_for(&id).display());
    Ok(())
}

pub async fn insert(
    ctx: &Context,
    id: &str,
    type_id: &str,
    at: Option<usize>,
    data: Option<&str>,
) -> Result<()> {
    let patch = data.map(parse_patch).transpose()?;
    let session = ctx.open(id).await?;

    let inserted = session.insert_block(type_id, at).await?;
    if let Some(patch) = patch {
        session.update_block(&inserted.block, patch).await?;
    }
    println!(
        "inserted {type_id} block {} at {}",
        inserted.block,
        inserted.index.unwrap_or_default()
    );
    commit(session).await
}

pub async fn update(ctx: &Context, id: &str, block: &str, patch: &str) -> Result<()> {
    let patch = parse_patch(patch)?;
    let session = ctx.open(id).await?;
    session.update_block(&BlockId::from(block), patch).await?;
    commit(session).await
}

pub async fn remove(ctx: &Context, id: &str, block: &str) -> Result<()> {
    let session = ctx.open(id).await?;
    session.remove_block(&BlockId::from(block)).await?;
    commit(session).await
}

pub async fn move_block(ctx: &Context, id: &str, block: &str, to: usize) -> Result<()> {
    let session = ctx.open(id).await?;
    let patch = session.move_block(&BlockId::from(block), to).await?;
    println!("moved {block} to {}", patch.index.unwrap_or(to));
    commit(session).await
}

pub async fn validate(ctx: &Context, id: &str) -> Result<()> {
    let session = ctx.open(id).await?;
    let report = session.validate().await?;
    session.close().await?;

    println!("{report}");
    if report.is_valid() {
        Ok(())
    } else {
        Err(anyhow!("{} invalid block(s)", report.blocks.len()))
    }
}

pub async fn render(ctx: &Context, id: Option<&str>, file: Option<PathBuf>) -> Result<()> {
    let html = match (id, file) {
        (_, Some(file)) => {
            let input = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            ctx.converter().wire_to_html(&input)?
        }
        (Some(id), None) => {
            let session = ctx.open(id).await?;
            let html = session.render().await?;
            session.close().await?;
            html
        }
        (None, None) => bail!("give a document id or --file"),
    };
    println!("{html}");
    Ok(())
}

pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let session = ctx.open(id).await?;
    let document = session.document().await?;
    session.close().await?;

    match document.updated_at {
        Some(at) => println!("{} version {} saved {}", document.id, document.version, at),
        None => println!("{} version {} (never saved)", document.id, document.version),
    }
    for (index, block) in document.blocks.iter().enumerate() {
        let data = block.data.to_value()?;
        println!("{index:>3}  {}  {:<16} {data}", block.id, block.type_id());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(store: &TempDir) -> Context {
        let config = Config {
            store_path: store.path().to_path_buf(),
            autosave_interval_secs: 0,
            ..Config::default()
        };
        Context::new(&config)
    }

    #[test]
    fn test_patch_must_be_an_object() {
        assert!(parse_patch(r#"{"text":"hi"}"#).is_ok());
        assert!(parse_patch("[1,2]").is_err());
        assert!(parse_patch("not json").is_err());
    }

    #[tokio::test]
    async fn test_new_insert_and_show() {
        let store = TempDir::new().unwrap();
        let ctx = context(&store);

        new(&ctx, "handbook").await.unwrap();
        assert!(new(&ctx, "handbook").await.is_err());

        insert(
            &ctx,
            "handbook",
            "process",
            None,
            Some(r#"{"name":"Invoice Approval"}"#),
        )
        .await
        .unwrap();

        let session = ctx.open("handbook").await.unwrap();
        let document = session.document().await.unwrap();
        assert_eq!(document.version, 1);
        assert_eq!(document.blocks[0].type_id(), "process");
    }

    #[tokio::test]
    async fn test_invalid_insert_is_not_saved() {
        let store = TempDir::new().unwrap();
        let ctx = context(&store);
        new(&ctx, "handbook").await.unwrap();

        let result = insert(&ctx, "handbook", "roleDefinition", None, None).await;

        assert!(result.is_err());
        let session = ctx.open("handbook").await.unwrap();
        assert!(session.document().await.unwrap().blocks.is_empty());
    }
}

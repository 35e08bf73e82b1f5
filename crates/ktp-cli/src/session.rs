//! Interactive session: one resource manager for the lifetime of the process.
//!
//! Records ingested during the session keep their bytes, so they can be viewed,
//! opened and downloaded; records loaded from the catalog cannot.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use ktp_core::{format_size, FileId};
use ktp_resources::{
    DirectoryDownloadSink, ExternalOpener, IncomingFile, IngestOutcome, Preview, ResourceManager,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::output::{print_listing, OutputFormat};

pub const HELP: &str = "\
Commands:
  drag-enter               start dragging over the drop target
  drag-leave               leave the drop target without dropping
  drop <path>...           drop files on the target
  choose <path>...         pick files through the chooser
  list                     list the catalog
  view <id>                preview a file
  open <id>                open a file externally
  download <id> [dir]      save a file
  status                   show drop target state and catalog size
  help                     show this help
  quit                     leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    DragEnter,
    DragLeave,
    Drop(Vec<PathBuf>),
    Choose(Vec<PathBuf>),
    List,
    View(FileId),
    Open(FileId),
    Download { id: FileId, dir: Option<PathBuf> },
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = split_args(line)?;
        let (command, args) = words
            .split_first()
            .ok_or_else(|| anyhow!("empty command"))?;
        let command = command.as_str();

        let one_id = |args: &[String]| -> anyhow::Result<FileId> {
            match args {
                [id] => Ok(FileId::from(id.as_str())),
                _ => Err(anyhow!("'{}' takes exactly one file id", command)),
            }
        };

        match command {
            "drag-enter" => Ok(SessionCommand::DragEnter),
            "drag-leave" => Ok(SessionCommand::DragLeave),
            "drop" => Ok(SessionCommand::Drop(paths(args))),
            "choose" => Ok(SessionCommand::Choose(paths(args))),
            "list" | "ls" => Ok(SessionCommand::List),
            "view" => one_id(args).map(SessionCommand::View),
            "open" => one_id(args).map(SessionCommand::Open),
            "download" => match args {
                [id] => Ok(SessionCommand::Download {
                    id: FileId::from(id.as_str()),
                    dir: None,
                }),
                [id, dir] => Ok(SessionCommand::Download {
                    id: FileId::from(id.as_str()),
                    dir: Some(PathBuf::from(dir)),
                }),
                _ => Err(anyhow!("usage: download <id> [dir]")),
            },
            "status" => Ok(SessionCommand::Status),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" => Ok(SessionCommand::Quit),
            other => Err(anyhow!("unknown command '{}', try 'help'", other)),
        }
    }
}

fn paths(args: &[String]) -> Vec<PathBuf> {
    args.iter().map(PathBuf::from).collect()
}

/// Split a command line into words. Single or double quotes group a word that
/// contains spaces; a backslash escapes the next character outside single quotes.
fn split_args(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| anyhow!("trailing backslash in '{}'", line))?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(anyhow!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Where session actions put their output.
pub struct SessionTargets {
    pub download_dir: PathBuf,
    pub opener: Box<dyn ExternalOpener>,
    pub format: OutputFormat,
}

/// Read commands line by line until `quit` or end of input.
pub async fn run_session<R>(
    manager: &mut ResourceManager,
    input: R,
    targets: &SessionTargets,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if command == SessionCommand::Quit {
            break;
        }
        execute(manager, command, targets).await?;
    }

    Ok(())
}

/// Run one command. Action failures are already reported to the user by the
/// manager's notifier, so only output failures propagate.
pub async fn execute(
    manager: &mut ResourceManager,
    command: SessionCommand,
    targets: &SessionTargets,
) -> anyhow::Result<()> {
    match command {
        SessionCommand::DragEnter => manager.drag_enter(),
        SessionCommand::DragLeave => manager.drag_leave(),
        SessionCommand::Drop(paths) => {
            let batch = read_files(&paths).await;
            report_outcome(&manager.drop_files(batch).await);
        }
        SessionCommand::Choose(paths) => {
            let batch = read_files(&paths).await;
            report_outcome(&manager.choose_files(batch).await);
        }
        SessionCommand::List => {
            print_listing(
                &manager.title(),
                &manager.breadcrumb(),
                manager.list(),
                targets.format,
            )?;
        }
        SessionCommand::View(id) => {
            if let Ok(preview) = manager.view(&id) {
                let name = manager.get(&id).map(|r| r.name().to_string()).unwrap_or_default();
                describe_preview(&name, &preview);
            }
        }
        SessionCommand::Open(id) => {
            if let Err(e) = manager.open_external(&id, targets.opener.as_ref()).await {
                tracing::debug!(error = %e, id = %id, "Open failed");
            }
        }
        SessionCommand::Download { id, dir } => {
            let dir = dir.unwrap_or_else(|| targets.download_dir.clone());
            let sink = DirectoryDownloadSink::new(dir);
            if let Ok(path) = manager.download(&id, &sink).await {
                println!("Saved to {}", path.display());
            }
        }
        SessionCommand::Status => {
            let available = manager.list().iter().filter(|r| r.is_available()).count();
            println!(
                "{} | drop target: {:?} | {} file(s), {} available in this session | \
                 {} live handle(s)",
                manager.title(),
                manager.drop_state(),
                manager.len(),
                available,
                manager.broker().live_handles()
            );
        }
        SessionCommand::Help => println!("{}", HELP),
        SessionCommand::Quit => {}
    }
    Ok(())
}

/// Read every path that can be read; unreadable paths are reported and skipped.
pub async fn read_files(paths: &[PathBuf]) -> Vec<IncomingFile> {
    let mut batch = Vec::with_capacity(paths.len());
    for path in paths {
        match IncomingFile::from_path(path).await {
            Ok(file) => batch.push(file),
            Err(e) => eprintln!("Skipping {}: {}", path.display(), e),
        }
    }
    batch
}

pub fn report_outcome(outcome: &IngestOutcome) {
    if outcome.is_noop() {
        println!("No files selected.");
        return;
    }
    for id in &outcome.admitted {
        println!("  + {}", id);
    }
    if !outcome.persisted {
        println!("Catalog not saved; these files will be missing after a reload.");
    }
}

fn describe_preview(name: &str, preview: &Preview) {
    match preview {
        Preview::Image { handle } | Preview::Document { handle } => println!(
            "{} preview of {} ({}) via {}",
            preview.kind(),
            name,
            format_size(handle.bytes().len() as u64),
            handle.url()
        ),
        Preview::Text { message } | Preview::Generic { message } => {
            println!("{}: {}", name, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ktp_core::ResourceContext;
    use ktp_resources::test_helpers::{memory_catalog, RecordingNotifier, RecordingOpener};
    use ktp_storage::MemoryKeyValueStore;

    #[test]
    fn parses_commands() {
        assert_eq!(
            "drag-enter".parse::<SessionCommand>().unwrap(),
            SessionCommand::DragEnter
        );
        assert_eq!(
            "drop a.txt b.png".parse::<SessionCommand>().unwrap(),
            SessionCommand::Drop(vec![PathBuf::from("a.txt"), PathBuf::from("b.png")])
        );
        assert_eq!(
            "download abc out".parse::<SessionCommand>().unwrap(),
            SessionCommand::Download {
                id: FileId::from("abc"),
                dir: Some(PathBuf::from("out")),
            }
        );
        assert_eq!(
            "  view  abc ".parse::<SessionCommand>().unwrap(),
            SessionCommand::View(FileId::from("abc"))
        );
    }

    #[test]
    fn quoted_arguments_keep_their_spaces() {
        assert_eq!(
            r#"choose "UI Guidelines.pdf" 'b c.png' d\ e.txt"#
                .parse::<SessionCommand>()
                .unwrap(),
            SessionCommand::Choose(vec![
                PathBuf::from("UI Guidelines.pdf"),
                PathBuf::from("b c.png"),
                PathBuf::from("d e.txt"),
            ])
        );
        assert_eq!(
            r#"download abc "My Downloads""#.parse::<SessionCommand>().unwrap(),
            SessionCommand::Download {
                id: FileId::from("abc"),
                dir: Some(PathBuf::from("My Downloads")),
            }
        );
        assert_eq!(
            r#"drop "it's.txt" ''"#.parse::<SessionCommand>().unwrap(),
            SessionCommand::Drop(vec![PathBuf::from("it's.txt"), PathBuf::from("")])
        );
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        assert!(r#"choose "UI Guidelines.pdf"#.parse::<SessionCommand>().is_err());
        assert!(r#"choose a\"#.parse::<SessionCommand>().is_err());
    }

    #[test]
    fn rejects_bad_commands() {
        assert!("".parse::<SessionCommand>().is_err());
        assert!("view".parse::<SessionCommand>().is_err());
        assert!("open a b".parse::<SessionCommand>().is_err());
        assert!("upload x".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn cancelled_chooser_is_an_empty_batch() {
        assert_eq!(
            "choose".parse::<SessionCommand>().unwrap(),
            SessionCommand::Choose(Vec::new())
        );
    }

    #[tokio::test]
    async fn session_ingests_and_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        tokio::fs::write(&source, b"hello").await.unwrap();

        let kv = MemoryKeyValueStore::new();
        let notifier = Arc::new(RecordingNotifier::new());
        let mut manager = ResourceManager::open(
            ResourceContext::default(),
            memory_catalog(&kv),
            notifier.clone(),
        )
        .await;

        let targets = SessionTargets {
            download_dir: dir.path().join("downloads"),
            opener: Box::new(RecordingOpener::new()),
            format: OutputFormat::Json,
        };

        let script = format!(
            "drag-enter\ndrag-leave\nchoose {}\nbogus\nlist\nquit\nchoose {}\n",
            source.display(),
            source.display()
        );
        run_session(&mut manager, script.as_bytes(), &targets).await.unwrap();

        assert_eq!(manager.len(), 1);
        assert_eq!(notifier.messages(), vec!["Successfully uploaded 1 file(s)!".to_string()]);

        let id = manager.list()[0].id().clone();
        execute(&mut manager, SessionCommand::Download { id, dir: None }, &targets)
            .await
            .unwrap();
        let saved = tokio::fs::read(dir.path().join("downloads").join("a.txt")).await.unwrap();
        assert_eq!(saved, b"hello");
    }
}

use std::{env, path::PathBuf};

use anyhow::Result;
use loci_config::ConfigStore;
use loci_core::{Folder, Note};
use loci_services::AppServicesBuilder;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let db_path = take_db_override(&mut args).unwrap_or_else(default_db_path);

    let Some(command) = args.first().cloned() else {
        print_usage();
        std::process::exit(2);
    };

    let config = ConfigStore::from_default_location()?.load_or_init()?;
    tracing::debug!(db = %db_path.display(), "opening database");
    let services = AppServicesBuilder::new(db_path).build()?;
    if config.seed_demo_data {
        services.seed_demo_workspace_data()?;
    }

    match command.as_str() {
        "seed" => {
            services.seed_demo_workspace_data()?;
            println!(
                "seeded: {} notes, {} folders",
                services.list_notes().len(),
                services.list_folders().len()
            );
        }
        "notes" => {
            for note in services.list_notes() {
                println!(
                    "{}  [{}] {} ({})",
                    note.id,
                    note.status.as_str(),
                    note.title,
                    note.workspace
                );
            }
        }
        "add" => {
            let Some(title) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            let content = args.get(2).cloned().unwrap_or_default();
            let note = Note::in_workspace(title.as_str(), content, config.default_workspace.clone());
            services.upsert_note(&note)?;
            println!("added note {}", note.id);
        }
        "search" => {
            let query = args[1..].join(" ");
            for result in services.search(&query) {
                println!("{:>4}  {}  {}", result.score, result.note.id, result.note.title);
            }
        }
        "folders" => {
            for folder in services.list_folders() {
                println!(
                    "{}  {} (notes: {}, parent: {})",
                    folder.id,
                    folder.name,
                    folder.note_count,
                    folder.parent_id.as_deref().unwrap_or("-")
                );
            }
        }
        "tree" => {
            let folders = services.list_folders();
            print_tree(&folders, None, 0);
        }
        "path" => {
            let Some(folder_id) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            let path = services.folder_path(folder_id);
            let names: Vec<&str> = path.iter().map(|entry| entry.name.as_str()).collect();
            println!("{}", names.join(" / "));
        }
        "delete-folder" => {
            let Some(folder_id) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            services.delete_folder(folder_id)?;
            println!("deleted folder {folder_id}");
        }
        "export" => {
            let Some(file) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            services.export_backup_json(file)?;
            println!("exported backup to {file}");
        }
        "import" => {
            let Some(file) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            let report = services.import_backup_json(file)?;
            println!("imported {} notes, {} folders", report.notes, report.folders);
        }
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_tree(folders: &[Folder], parent: Option<&str>, depth: usize) {
    for folder in loci_core::folders_by_parent(folders, parent) {
        println!("{}{} ({})", "  ".repeat(depth), folder.name, folder.note_count);
        print_tree(folders, Some(&folder.id), depth + 1);
    }
}

fn take_db_override(args: &mut Vec<String>) -> Option<PathBuf> {
    let position = args.iter().position(|arg| arg == "--db")?;
    if position + 1 >= args.len() {
        return None;
    }
    let path = args.remove(position + 1);
    args.remove(position);
    Some(PathBuf::from(path))
}

fn default_db_path() -> PathBuf {
    let mut base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    base.push("data");
    base.push("loci.sqlite3");
    base
}

fn print_usage() {
    eprintln!(
        "Usage: loci [--db <path>] <command>\n\
         Commands:\n\
           seed                      seed starter notes and folders\n\
           notes                     list all notes\n\
           add <title> [content]     create a note in the default workspace\n\
           search <query...>         rank notes against a free-text query\n\
           folders                   list all folders\n\
           tree                      print the folder hierarchy\n\
           path <folder-id>          print the root-first ancestor path\n\
           delete-folder <folder-id> delete a folder (guarded)\n\
           export <file>             write a JSON backup\n\
           import <file>             load a JSON backup"
    );
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use client::{App, Config, DueBucket, NoticeLevel, StoreEvent};
use common::{
    FetchFilters, Priority, PriorityFilter, ProjectDraft, ProjectPatch, StatusFilter, Task,
    TaskDraft, TaskPatch, View, colors,
};
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Personal task manager client")]
struct Cli {
    /// Base URL of the task service (overrides TASKDECK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token of the session (overrides TASKDECK_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tasks of a view
    List {
        #[arg(long)]
        view: Option<View>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        status: Option<StatusFilter>,
        #[arg(long)]
        priority: Option<PriorityFilter>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show task statistics
    Stats,
    /// Show the dashboard summary
    Dashboard,
    /// Create a task
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long, default_value = "MEDIUM")]
        priority: Priority,
        #[arg(long)]
        project: Option<String>,
    },
    /// Edit a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "no_project")]
        project: Option<String>,
        #[arg(long)]
        no_project: bool,
    },
    /// Toggle completion of a task
    Done { id: String },
    /// Move a task to the trash
    Rm { id: String },
    /// Take a task out of the trash
    Restore { id: String },
    /// Delete a task for good
    Purge {
        id: String,
        /// Confirm that the task cannot be recovered afterwards
        #[arg(long)]
        yes: bool,
    },
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommand),
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// List projects with their progress
    List,
    /// Create a project
    Add {
        name: String,
        /// Palette color, by name or hex code
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename or recolor a project
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a project; its tasks move to "no project"
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.api_url.as_deref(), cli.token)?;
    tracing::debug!("Using task service at {}", config.api_url);

    let app = App::from_config(&config);
    if !app.session.is_signed_in() {
        bail!("Not signed in: set TASKDECK_TOKEN or pass --token");
    }

    let mut events = app.subscribe();
    let result = run(&app, cli.command).await;
    print_notices(&mut events);
    result
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::List {
            view,
            project,
            status,
            priority,
            search,
        } => {
            let filters = FetchFilters {
                view,
                project_id: project,
                status,
                priority,
                search,
            };
            app.tasks.fetch(&filters).await?;
            println!("{} ({})", view.unwrap_or_default().title(), app.tasks.len());
            let today = Local::now().date_naive();
            for task in app.tasks.tasks() {
                print_task(&task, today);
            }
        }
        Command::Stats => {
            app.tasks.fetch(&FetchFilters::default()).await?;
            let stats = app.tasks.stats();
            println!("Total:         {}", stats.total);
            println!("Completed:     {} ({}%)", stats.completed, stats.completion_rate());
            println!("Pending:       {}", stats.pending);
            println!("Overdue:       {}", stats.overdue);
            println!("Due today:     {}", stats.due_today);
            println!("High priority: {}", stats.high_priority);
            println!("In trash:      {}", stats.in_trash);
        }
        Command::Dashboard => {
            app.tasks.fetch(&FetchFilters::default()).await?;
            app.projects.fetch().await?;
            let dashboard = app.dashboard();
            let today = Local::now().date_naive();
            println!(
                "{} tasks, {}% complete, {} pending ({} high priority), {} projects",
                dashboard.stats.total,
                dashboard.completion_rate,
                dashboard.stats.pending,
                dashboard.stats.high_priority,
                dashboard.project_count
            );
            for (title, tasks) in [
                ("Overdue", &dashboard.overdue),
                ("Due today", &dashboard.due_today),
                ("Recent", &dashboard.recent),
            ] {
                println!("\n{title}");
                for task in tasks {
                    print_task(task, today);
                }
            }
        }
        Command::Add {
            title,
            description,
            due,
            priority,
            project,
        } => {
            let draft = TaskDraft {
                title,
                description,
                due_date: due,
                priority,
                project_id: project,
            };
            let task = app.tasks.create(draft).await?;
            println!("{}", task.id);
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            priority,
            project,
            no_project,
        } => {
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                priority,
                project_id: if no_project {
                    Some(None)
                } else {
                    project.map(Some)
                },
            };
            if patch.is_empty() {
                bail!("Nothing to change");
            }
            app.tasks.update(&id, patch).await?;
        }
        Command::Done { id } => {
            app.tasks.toggle_complete(&id).await?;
        }
        Command::Rm { id } => {
            app.tasks.soft_delete(&id).await?;
        }
        Command::Restore { id } => {
            app.tasks.restore(&id).await?;
        }
        Command::Purge { id, yes } => {
            if !yes {
                bail!("Permanent deletion cannot be undone; pass --yes to confirm");
            }
            app.tasks.permanent_delete(&id).await?;
        }
        Command::Projects(command) => run_projects(app, command).await?,
    }
    Ok(())
}

async fn run_projects(app: &App, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List => {
            app.projects.fetch().await?;
            app.tasks.fetch(&FetchFilters::default()).await?;
            for summary in app.projects.summaries(&app.tasks.tasks()) {
                println!(
                    "{}  {} [{}]  {}/{} ({}%)",
                    summary.project.id,
                    summary.project.name,
                    summary.project.color,
                    summary.counts.completed,
                    summary.counts.total,
                    summary.completion_rate
                );
            }
        }
        ProjectCommand::Add { name, color } => {
            let color = match color {
                Some(color) => palette_color(&color)?,
                None => {
                    app.projects.fetch().await?;
                    colors::suggest(app.projects.len())
                }
            };
            let project = app.projects.create(ProjectDraft::new(name).color(color)).await?;
            println!("{}", project.id);
        }
        ProjectCommand::Edit { id, name, color } => {
            let patch = ProjectPatch {
                name,
                color: color.as_deref().map(palette_color).transpose()?.map(str::to_string),
            };
            app.projects.update(&id, patch).await?;
        }
        ProjectCommand::Rm { id } => {
            app.projects.delete(&id).await?;
        }
    }
    Ok(())
}

fn palette_color(color: &str) -> Result<&'static str> {
    match colors::resolve(color) {
        Some(hex) => Ok(hex),
        None => bail!(
            "Unknown color '{color}', pick one of: {}",
            colors::PALETTE
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn print_task(task: &Task, today: NaiveDate) {
    let mark = if task.is_deleted {
        "x"
    } else if task.is_complete {
        "✓"
    } else {
        " "
    };
    let due = DueBucket::of(task, today)
        .map(|bucket| format!("  ({})", bucket.label()))
        .unwrap_or_default();
    let project = task
        .project
        .as_ref()
        .map(|p| format!("  #{}", p.name))
        .unwrap_or_default();
    println!(
        "[{mark}] {}  {} [{}]{due}{project}",
        task.id, task.title, task.priority
    );
}

fn print_notices(events: &mut broadcast::Receiver<StoreEvent>) {
    while let Ok(event) = events.try_recv() {
        if let StoreEvent::Notice(notice) = event {
            match notice.level {
                NoticeLevel::Success => eprintln!("{}", notice.message),
                NoticeLevel::Error => eprintln!("error: {}", notice.message),
            }
        }
    }
}

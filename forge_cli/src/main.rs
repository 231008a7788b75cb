use clap::{Parser, Subcommand};
use forge_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Workout plan generator and fitness progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a weekly workout plan
    Plan {
        /// gym or home
        #[arg(long)]
        location: Option<String>,

        /// bulking, cutting or maintenance
        #[arg(long)]
        goal: Option<String>,

        /// beginner, intermediate or advanced
        #[arg(long)]
        level: Option<String>,

        /// Training days per week (clamped to 1-6)
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,

        /// Print the plan response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show points, title, level and today's tasks
    Status {
        #[arg(long)]
        json: bool,
    },

    /// Mark a task done, or back to pending
    Toggle {
        /// Zero-based task index
        index: usize,

        /// today, workouts, meals or meditations
        #[arg(long, default_value = "today")]
        category: String,
    },

    /// Set up workout, meal and meditation tasks for the profile goal
    InitTasks,

    /// Add a custom workout, meal or meditation task
    AddTask {
        category: String,
        name: String,

        #[arg(long)]
        points: Option<u32>,
    },

    /// Store the body profile
    Profile {
        #[arg(long)]
        age: u32,

        /// male, female or other
        #[arg(long)]
        sex: String,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        #[arg(long)]
        goal: String,
    },

    /// Show BMI and BMR for the stored profile
    Metrics,

    /// Record a weight measurement in the progress log
    Log {
        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Points earned so far
        #[arg(long)]
        points: u32,
    },

    /// Show recent progress log entries
    History {
        /// Window in days (1-36500)
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(1..=36500))]
        days: i64,
    },

    /// Suggest up to four meals per meal type for today
    Meals {
        /// vegetarian, vegan or non-vegetarian
        #[arg(long)]
        diet: Option<String>,

        /// bulking, cutting or maintenance
        #[arg(long)]
        phase: Option<String>,

        /// Draw a fresh set instead of today's
        #[arg(long)]
        regen: bool,

        #[arg(long)]
        json: bool,
    },

    /// Roll up the progress WAL to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// File layout under the data directory
struct Paths {
    wal_dir: PathBuf,
    state: PathBuf,
    wal: PathBuf,
    csv: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            state: wal_dir.join("state.json"),
            wal: wal_dir.join("progress.wal"),
            csv: data_dir.join("progress.csv"),
            wal_dir,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    forge_core::logging::init_with_level(if cli.verbose { "debug" } else { "info" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_recoverable() {
                eprintln!("{}", e);
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths::new(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Plan {
            location,
            goal,
            level,
            days,
            json,
        } => {
            let query = PlanQuery {
                location,
                goal,
                level,
                days,
            };
            cmd_plan(&config, &query, json)
        }
        Commands::Status { json } => cmd_status(&config, &paths, json),
        Commands::Toggle { index, category } => cmd_toggle(&config, &paths, index, &category),
        Commands::InitTasks => cmd_init_tasks(&paths),
        Commands::AddTask {
            category,
            name,
            points,
        } => cmd_add_task(&paths, &category, &name, points),
        Commands::Profile {
            age,
            sex,
            height,
            weight,
            goal,
        } => cmd_profile(&paths, age, &sex, height, weight, &goal),
        Commands::Metrics => cmd_metrics(&paths),
        Commands::Log { weight, points } => cmd_log(&paths, weight, points),
        Commands::History { days } => cmd_history(&paths, days),
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
        Commands::Meals {
            diet,
            phase,
            regen,
            json,
        } => cmd_meals(&config, diet.as_deref(), phase.as_deref(), regen, json),
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load_from(path)?,
        None => build_default_catalog(),
    };

    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    Ok(catalog)
}

fn cmd_plan(config: &Config, query: &PlanQuery, json: bool) -> Result<()> {
    let catalog = load_catalog(config)?;
    // One plan per process; the cache only pays off for long-lived callers
    let service = PlanService::new(catalog, config.plan.clone());

    let response = service.generate(query, chrono::Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let meta = &response.meta;
    println!(
        "{}-day {} plan ({}, {})",
        meta.days, meta.level, meta.goal, meta.location
    );
    for day in &response.workouts.days {
        println!();
        println!("{}", day.label);
        if day.exercises.is_empty() {
            println!("  (no matching exercises)");
        }
        for exercise in &day.exercises {
            println!(
                "  {:<28} {} x {:<6} rest {}",
                exercise.name, exercise.sets, exercise.reps, exercise.rest
            );
        }
    }

    Ok(())
}

fn cmd_status(config: &Config, paths: &Paths, json: bool) -> Result<()> {
    let mut rng = rand::thread_rng();
    let record = UserRecord::fetch_current(
        &paths.state,
        chrono::Utc::now(),
        &mut rng,
        &config.tasks.pool(),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let p = &record.progression;
    println!("{} (level {})", p.title, p.level);
    println!("  Points: {}", p.points);
    println!("  Streak: {}", p.streak);
    println!();
    println!("Today:");
    for (i, task) in p.today_tasks.iter().enumerate() {
        println!("  {} [{}] {}", i, if task.done { "x" } else { " " }, task.name);
    }

    for category in [
        TaskCategory::Workouts,
        TaskCategory::Meals,
        TaskCategory::Meditations,
    ] {
        let tasks = match p.task_list(category) {
            Some(tasks) if !tasks.is_empty() => tasks,
            _ => continue,
        };
        println!();
        println!("{}:", capitalize(&category.to_string()));
        for (i, task) in tasks.iter().enumerate() {
            println!(
                "  {} [{}] {} ({} pts)",
                i,
                if task.done { "x" } else { " " },
                task.name,
                task.points
            );
        }
    }

    Ok(())
}

fn cmd_toggle(config: &Config, paths: &Paths, index: usize, category: &str) -> Result<()> {
    let category = parse_category(category)?;
    let outcome = UserRecord::toggle(&paths.state, category, index, config.tasks.daily_points)?;

    let mark = if outcome.done { "✓" } else { "↺" };
    println!(
        "{} {} ({})",
        mark,
        outcome.task,
        if outcome.done { "done" } else { "pending" }
    );
    println!(
        "  Points: {}  Streak: {}  {} (level {})",
        outcome.points, outcome.streak, outcome.title, outcome.level
    );

    Ok(())
}

fn cmd_init_tasks(paths: &Paths) -> Result<()> {
    let (record, goal) = UserRecord::update(&paths.state, |record| {
        let goal = record.profile.as_ref().map(|p| p.goal).unwrap_or_default();
        record.progression.initialize_for_goal(goal);
        Ok(goal)
    })?;

    println!("✓ Task lists set up for {} goal", goal);
    for category in [
        TaskCategory::Workouts,
        TaskCategory::Meals,
        TaskCategory::Meditations,
    ] {
        for task in record.progression.task_list(category).into_iter().flatten() {
            println!("  {}: {} ({} pts)", category, task.name, task.points);
        }
    }

    Ok(())
}

fn cmd_add_task(paths: &Paths, category: &str, name: &str, points: Option<u32>) -> Result<()> {
    let category = parse_category(category)?;
    let (_, task) = UserRecord::update(&paths.state, |record| {
        record
            .progression
            .add_task(category, name, points)
            .cloned()
    })?;

    println!("✓ Added {} task '{}' ({} pts)", category, task.name, task.points);
    Ok(())
}

fn cmd_profile(
    paths: &Paths,
    age: u32,
    sex: &str,
    height_cm: f64,
    weight_kg: f64,
    goal: &str,
) -> Result<()> {
    let sex = Sex::parse(sex).ok_or_else(|| Error::UnknownValue {
        field: "sex",
        value: sex.to_string(),
    })?;
    let profile = Profile {
        age,
        sex,
        height_cm,
        weight_kg,
        goal: Goal::from_lenient(goal),
    };
    profile.validate()?;

    let metrics = profile.metrics();
    UserRecord::update(&paths.state, |record| {
        record.profile = Some(profile);
        Ok(())
    })?;

    println!("✓ Profile saved");
    print_metrics(&metrics);
    Ok(())
}

fn cmd_metrics(paths: &Paths) -> Result<()> {
    let record = UserRecord::load(&paths.state)?;
    let profile = record.profile.ok_or_else(|| {
        Error::InvalidProfile("no profile stored; run `forge profile` first".into())
    })?;

    print_metrics(&profile.metrics());
    Ok(())
}

fn print_metrics(metrics: &BodyMetrics) {
    println!("  BMI: {:.1}", metrics.bmi);
    println!("  BMR: {} kcal/day", metrics.bmr);
}

fn cmd_log(paths: &Paths, weight_kg: f64, points: u32) -> Result<()> {
    let entry = JsonlSink::new(&paths.wal).log(weight_kg, points, chrono::Utc::now())?;

    println!("✓ Logged {:.1} kg ({} points)", entry.weight_kg, entry.points);
    Ok(())
}

fn cmd_history(paths: &Paths, days: i64) -> Result<()> {
    let entries = load_recent_entries(&paths.wal, &paths.csv, days)?;

    if entries.is_empty() {
        println!("No progress entries in the last {} days.", days);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "  {}  {:>6.1} kg  {:>5} pts",
            entry.logged_at.format("%Y-%m-%d"),
            entry.weight_kg,
            entry.points
        );
    }

    if let Some(change) = history::weight_change(&entries) {
        println!();
        println!("  Change: {:+.1} kg", change);
    }

    Ok(())
}

fn cmd_rollup(paths: &Paths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let report = forge_core::csv_rollup::archive_wal(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} entries to CSV", report.archived);
    if report.already_archived > 0 {
        println!("  Skipped {} entries already archived", report.already_archived);
    }
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = forge_core::csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

fn cmd_meals(
    config: &Config,
    diet: Option<&str>,
    phase: Option<&str>,
    regen: bool,
    json: bool,
) -> Result<()> {
    let filter = MealFilter {
        diet: diet.map(Diet::parse).transpose()?,
        phase: phase.map(Goal::from_lenient),
    };

    let catalog = match &config.catalog.meals_path {
        Some(path) => MealCatalog::load_from(path)?,
        None => get_default_meals().clone(),
    };
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Meal catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid meal catalog".into()));
    }

    let today = chrono::Utc::now().date_naive();
    let seed = if regen {
        MealSeed::regenerate(today, rand::random())
    } else {
        MealSeed::daily(today)
    };
    let groups = suggest_meals(&catalog, &filter, &seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No meals match those filters.");
        return Ok(());
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}:", group.meal_type);
        for meal in &group.meals {
            println!(
                "  {:<36} {:>4} kcal  P {:>3}g  C {:>3}g  F {:>3}g",
                meal.name, meal.calories, meal.protein_g, meal.carbs_g, meal.fats_g
            );
        }
    }

    Ok(())
}

fn parse_category(s: &str) -> Result<TaskCategory> {
    TaskCategory::parse(s).ok_or_else(|| Error::UnknownValue {
        field: "category",
        value: s.to_string(),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

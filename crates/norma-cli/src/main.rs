use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use norma_cli::CliResult;
use norma_cli::accounts::{self, AdminOutcome, NewAccount};
use norma_cli::seeder;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "norma-cli")]
#[command(about = "Norma CLI - Administrative tools for the Norma API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account, or promote an existing user to admin
    CreateAdmin {
        #[command(flatten)]
        account: AccountArgs,
    },
    /// Create a regular user account
    CreateUser {
        #[command(flatten)]
        account: AccountArgs,
    },
    /// List all users
    ListUsers,
    /// Seed the database with fake legal updates
    SeedLegalUpdates {
        /// Number of legal updates to create
        #[arg(short = 'c', long, default_value = "100")]
        count: usize,
    },
    /// Delete all seeded legal updates
    ClearSeed,
}

#[derive(clap::Args)]
struct AccountArgs {
    /// Email address
    #[arg(short = 'e', long)]
    email: Option<String>,

    /// Password (will be prompted securely if not provided)
    #[arg(short = 'p', long)]
    password: Option<String>,

    #[arg(short = 'f', long)]
    first_name: Option<String>,

    #[arg(short = 'l', long)]
    last_name: Option<String>,

    #[arg(short = 'c', long)]
    company: Option<String>,
}

impl AccountArgs {
    /// Prompts for every value not passed on the command line.
    fn into_account(self) -> CliResult<NewAccount> {
        let email = match self.email {
            Some(email) => email,
            None => Input::<String>::new().with_prompt("Email address").interact_text()?,
        };
        let first_name = match self.first_name {
            Some(name) => name,
            None => Input::<String>::new().with_prompt("First name").interact_text()?,
        };
        let last_name = match self.last_name {
            Some(name) => name,
            None => Input::<String>::new().with_prompt("Last name").interact_text()?,
        };
        let password = match self.password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact()?,
        };

        Ok(NewAccount {
            email,
            password,
            first_name,
            last_name,
            company: self.company.filter(|c| !c.trim().is_empty()),
        })
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match norma_db::init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => fail("connecting to database", e),
    };

    let result = match cli.command {
        Commands::CreateAdmin { account } => handle_create_admin(&pool, account).await,
        Commands::CreateUser { account } => handle_create_user(&pool, account).await,
        Commands::ListUsers => handle_list_users(&pool).await,
        Commands::SeedLegalUpdates { count } => seeder::seed_legal_updates(&pool, count)
            .await
            .map(|n| println!("✅ Seeded {} legal updates", n)),
        Commands::ClearSeed => seeder::clear_legal_updates(&pool)
            .await
            .map(|n| println!("✅ Cleared {} seeded legal updates", n)),
    };

    if let Err(e) = result {
        fail("running command", e);
    }
}

fn fail(action: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ Error {}: {}", action, err);
    std::process::exit(1);
}

async fn handle_create_admin(pool: &PgPool, args: AccountArgs) -> CliResult<()> {
    let account = args.into_account()?;

    match accounts::create_or_promote_admin(pool, &account).await? {
        AdminOutcome::Created => println!("\n✅ Admin created successfully!"),
        AdminOutcome::Promoted => println!("\n✅ Existing user promoted to admin"),
        AdminOutcome::AlreadyAdmin => println!("\nℹ️  User is already an admin"),
    }
    println!("   Email: {}", account.email);
    Ok(())
}

async fn handle_create_user(pool: &PgPool, args: AccountArgs) -> CliResult<()> {
    let account = args.into_account()?;
    let user = accounts::create_user(pool, &account).await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {}", user.id);
    println!("   Email: {}", user.email);
    println!("   Name: {}", user.full_name());
    Ok(())
}

async fn handle_list_users(pool: &PgPool) -> CliResult<()> {
    let users = accounts::list_users(pool).await?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{:>6}  {:<40}  {:<5}  NAME", "ID", "EMAIL", "ROLE");
    for user in &users {
        println!("{}", accounts::format_user_row(user));
    }
    println!("\n{} user(s)", users.len());
    Ok(())
}

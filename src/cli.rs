// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Command Line Front End
//!
//! One subcommand per screen of the voting client. Every command passes
//! through the route guard first, so protected commands fail with a hint to
//! sign in when no session token is stored.
//!
//! Results go to stdout; notices and logs go to stderr.

use clap::{Args, Parser, Subcommand};

use crate::error::ClientError;
use crate::models::{ElectionForm, ElectionStatus, RegisterRequest};
use crate::session::{guard, navigation_links, Access, Role, Route, Session};
use crate::workflows::admin;
use crate::workflows::auth;
use crate::workflows::elections;
use crate::workflows::governance;
use crate::workflows::search::{CandidateSearch, SessionDirectory};
use crate::workflows::voting::{self, VoteOutcome};
use crate::workflows::wallet;
use crate::workflows::{ChainSync, ClientContext};

#[derive(Parser, Debug)]
#[command(name = "ballot", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BALLOT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user and the available pages.
    Whoami,
    /// Wallet connection.
    #[command(subcommand)]
    Wallet(WalletCommand),
    /// Browse and manage elections.
    #[command(subcommand)]
    Elections(ElectionsCommand),
    /// Manage candidates (admin).
    #[command(subcommand)]
    Candidates(CandidatesCommand),
    /// Vote for a candidate.
    Vote { election_id: u64, candidate_id: u64 },
    /// List your votes.
    MyVotes,
    /// Admin dashboard.
    #[command(subcommand)]
    Admin(AdminCommand),
    /// DPoS governance.
    #[command(subcommand)]
    Governance(GovernanceCommand),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub national_id: String,
    #[arg(long, env = "BALLOT_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub password_confirmation: String,
}

#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// Link the wallet's active account to your profile.
    Connect,
    /// Log account changes until interrupted.
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum ElectionsCommand {
    List,
    /// Election details with live vote counts.
    Show { id: u64 },
    /// Results chart data.
    Results { id: u64 },
    Create(ElectionArgs),
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        status: Option<ElectionStatus>,
    },
}

#[derive(Args, Debug)]
pub struct ElectionArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Start, `YYYY-MM-DDTHH:MM`.
    #[arg(long)]
    pub start: String,
    /// End, `YYYY-MM-DDTHH:MM`.
    #[arg(long)]
    pub end: String,
}

#[derive(Subcommand, Debug)]
pub enum CandidatesCommand {
    /// Search users by name or email.
    Search { query: String },
    /// Add the user found by `--user` as a candidate.
    Add {
        election_id: u64,
        #[arg(long)]
        user: String,
        /// Index into the search results.
        #[arg(long, default_value_t = 0)]
        pick: usize,
        #[arg(long, default_value = "")]
        bio: String,
    },
    Remove { candidate_id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum GovernanceCommand {
    /// Delegates and your stake.
    Info,
    /// Stake an ether amount, e.g. `0.5`.
    Stake { amount: String },
    /// Register yourself as a delegate.
    Register { name: String },
    /// Vote for a delegate by address.
    Vote { delegate: String },
}

impl Command {
    /// Screen the command belongs to.
    pub fn route(&self) -> Route {
        match self {
            Command::Login { .. } => Route::Login,
            Command::Register(_) => Route::Register,
            Command::Logout | Command::Whoami | Command::Wallet(_) => Route::Elections,
            Command::Elections(ElectionsCommand::Show { id })
            | Command::Elections(ElectionsCommand::Results { id })
            | Command::Elections(ElectionsCommand::Edit { id, .. }) => Route::ElectionDetails(*id),
            Command::Elections(_) => Route::Elections,
            Command::Candidates(CandidatesCommand::Add { election_id, .. }) => {
                Route::ElectionDetails(*election_id)
            }
            Command::Candidates(_) => Route::Elections,
            Command::Vote { election_id, .. } => Route::ElectionDetails(*election_id),
            Command::MyVotes => Route::MyVotes,
            Command::Admin(_) => Route::AdminStats,
            Command::Governance(_) => Route::Governance,
        }
    }

    fn requires_admin(&self) -> bool {
        matches!(
            self,
            Command::Admin(_)
                | Command::Candidates(_)
                | Command::Elections(ElectionsCommand::Create(_))
                | Command::Elections(ElectionsCommand::Edit { .. })
        )
    }
}

/// Run one command against the stored session.
pub async fn run(cli: Cli, ctx: &ClientContext) -> Result<(), ClientError> {
    let mut session = ctx.load_session()?;

    if let Access::Redirect(to) = guard(cli.command.route(), &session) {
        eprintln!("Sign in first: ballot login ({})", to.path());
        return Err(ClientError::Unauthenticated);
    }
    if cli.command.requires_admin() && !session.role().is_some_and(|r| r.has_privilege(Role::Admin)) {
        ctx.notifier.error("Admin privileges required", None);
        return Err(ClientError::Forbidden);
    }

    match cli.command {
        Command::Login { email, password } => {
            auth::login(ctx, &mut session, &email, &password).await
        }
        Command::Register(args) => {
            let request = RegisterRequest {
                name: args.name,
                email: args.email,
                national_id: args.national_id,
                password: args.password,
                password_confirmation: args.password_confirmation,
            };
            auth::register(ctx, &mut session, &request).await
        }
        Command::Logout => auth::logout(ctx, &mut session),
        Command::Whoami => {
            print_whoami(&session);
            Ok(())
        }
        Command::Wallet(command) => run_wallet(ctx, &mut session, command).await,
        Command::Elections(command) => run_elections(ctx, &session, command).await,
        Command::Candidates(command) => run_candidates(ctx, &session, command).await,
        Command::Vote {
            election_id,
            candidate_id,
        } => match voting::cast_vote(ctx, &session, election_id, candidate_id).await? {
            VoteOutcome::Recorded(tx_hash) => {
                println!("Vote recorded: {tx_hash}");
                Ok(())
            }
            VoteOutcome::RecordPending { tx_hash, reason } => {
                println!("Vote on chain ({tx_hash}) but not recorded: {reason}");
                Ok(())
            }
            VoteOutcome::Ineligible(message) => Err(ClientError::Validation(message)),
        },
        Command::MyVotes => {
            let votes = elections::my_votes(ctx, &session).await?;
            if votes.is_empty() {
                println!("You have not voted yet.");
            }
            for vote in votes {
                let hash = match vote.transaction_hash.as_deref() {
                    Some(hash) if vote.is_confirmed() => hash.to_string(),
                    _ => "pending confirmation".to_string(),
                };
                println!("{}  {}  {}  {}", vote.created_at, vote.election.id, vote.election.title, hash);
            }
            Ok(())
        }
        Command::Admin(AdminCommand::Stats) => {
            let stats = admin::admin_stats(ctx, &session).await?;
            println!("Users:            {}", stats.total_users);
            println!("Votes:            {}", stats.total_votes);
            println!("Active elections: {}", stats.active_elections);
            Ok(())
        }
        Command::Governance(command) => run_governance(ctx, &session, command).await,
    }
}

fn print_whoami(session: &Session) {
    match session.user() {
        Some(user) => {
            println!("{} <{}> ({})", user.name, user.email, user.role);
            match &user.wallet_address {
                Some(wallet) => println!("Wallet: {wallet}"),
                None => println!("Wallet: not linked"),
            }
        }
        None => println!("Signed in (no profile cached)"),
    }
    for link in navigation_links(session.role()) {
        println!("  {:<20} {}", link.label, link.route.path());
    }
}

async fn run_wallet(
    ctx: &ClientContext,
    session: &mut Session,
    command: WalletCommand,
) -> Result<(), ClientError> {
    match command {
        WalletCommand::Connect => {
            let address = wallet::connect_wallet(ctx, session).await?;
            println!("{address}");
            Ok(())
        }
        WalletCommand::Watch => {
            let listener = wallet::watch_accounts(ctx)?;
            eprintln!("Watching wallet accounts, press Ctrl-C to stop");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Could not listen for Ctrl-C");
            }
            listener.unsubscribe();
            Ok(())
        }
    }
}

async fn run_elections(
    ctx: &ClientContext,
    session: &Session,
    command: ElectionsCommand,
) -> Result<(), ClientError> {
    match command {
        ElectionsCommand::List => {
            for election in elections::list_elections(ctx, session).await? {
                println!(
                    "{:>4}  {:<10} {}  ({} .. {})",
                    election.id, election.status, election.title, election.start_date, election.end_date
                );
            }
            Ok(())
        }
        ElectionsCommand::Show { id } => {
            let details = elections::election_details(ctx, session, id).await?;
            let election = &details.election;
            println!("{} [{}]", election.title, election.status);
            if let Some(description) = &election.description {
                println!("{description}");
            }
            println!("{} .. {}", election.start_date, election.end_date);
            for candidate in &details.candidates {
                println!(
                    "{:>4}  {:<24} {:>6} votes  {}",
                    candidate.id,
                    candidate.user.name,
                    candidate.votes,
                    candidate.bio.as_deref().unwrap_or_default()
                );
            }
            Ok(())
        }
        ElectionsCommand::Results { id } => {
            let results = elections::election_details(ctx, session, id).await?.results();
            if results.total_votes == 0 {
                println!("No votes yet.");
            }
            for row in &results.rows {
                println!("{:<24} {:>6} {:>6.1}%", row.name, row.votes, row.share);
            }
            println!("Total: {}", results.total_votes);
            Ok(())
        }
        ElectionsCommand::Create(args) => {
            let form = ElectionForm {
                title: args.title,
                description: args.description,
                start_date: args.start,
                end_date: args.end,
                status: None,
            };
            let saved = admin::create_election(ctx, session, &form).await?;
            print_saved(saved.election.id, &saved.chain);
            Ok(())
        }
        ElectionsCommand::Edit {
            id,
            title,
            description,
            start,
            end,
            status,
        } => {
            let current = elections::load_election(ctx, session, id).await?;
            let mut form = ElectionForm::from_election(&current);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(start) = start {
                form.start_date = start;
            }
            if let Some(end) = end {
                form.end_date = end;
            }
            if status.is_some() {
                form.status = status;
            }
            let saved = admin::edit_election(ctx, session, &current, &form).await?;
            print_saved(saved.election.id, &saved.chain);
            Ok(())
        }
    }
}

fn print_saved(id: u64, chain: &ChainSync) {
    match chain {
        ChainSync::Synced => println!("Election {id} saved and synchronized"),
        ChainSync::Skipped => println!("Election {id} saved"),
        ChainSync::Pending(reason) => println!("Election {id} saved; chain not updated: {reason}"),
    }
}

async fn run_candidates(
    ctx: &ClientContext,
    session: &Session,
    command: CandidatesCommand,
) -> Result<(), ClientError> {
    match command {
        CandidatesCommand::Search { query } => {
            let search = search_users(ctx, session, &query).await;
            for (index, user) in search.state().results.iter().enumerate() {
                println!(
                    "[{index}] {:>4}  {}  {}",
                    user.id,
                    user.name,
                    user.email.as_deref().unwrap_or_default()
                );
            }
            Ok(())
        }
        CandidatesCommand::Add {
            election_id,
            user,
            pick,
            bio,
        } => {
            let mut search = search_users(ctx, session, &user).await;
            if let Some(found) = search.state().results.get(pick).cloned() {
                search.select(found);
            }
            let candidate =
                admin::add_candidate(ctx, session, election_id, search.selected(), &bio).await?;
            println!("Candidate {} added", candidate.id);
            Ok(())
        }
        CandidatesCommand::Remove { candidate_id } => {
            admin::remove_candidate(ctx, session, candidate_id).await
        }
    }
}

async fn search_users(ctx: &ClientContext, session: &Session, query: &str) -> CandidateSearch {
    let directory = SessionDirectory::new(ctx.api.clone(), session);
    let mut search = CandidateSearch::new(std::sync::Arc::new(directory));
    search.set_query(query);
    search.settled().await;
    search
}

async fn run_governance(
    ctx: &ClientContext,
    session: &Session,
    command: GovernanceCommand,
) -> Result<(), ClientError> {
    match command {
        GovernanceCommand::Info => {
            let info = governance::governance_info(ctx, session).await;
            println!("My stake: {} ETH", info.my_stake);
            for delegate in &info.delegates {
                println!(
                    "{}  {:<24} {} ETH",
                    delegate.wallet,
                    delegate.name,
                    delegate.formatted_votes()
                );
            }
            Ok(())
        }
        GovernanceCommand::Stake { amount } => governance::stake(ctx, &amount).await.map(drop),
        GovernanceCommand::Register { name } => {
            governance::register_delegate(ctx, &name).await.map(drop)
        }
        GovernanceCommand::Vote { delegate } => {
            governance::vote_for_delegate(ctx, &delegate).await.map(drop)
        }
    }
}

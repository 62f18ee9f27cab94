use std::error::Error;

use clap::Parser;
use finaut_client::client::FinAutClient;
use finaut_client::parameters::{Commands, ConnectionArgs, OutputTokenFormat};
use finaut_client::persnr::generate_test_persnrs;
use finaut_client::resources::users::UserQuery;

#[derive(Parser, Debug)]
#[command(name = "finaut-cli", about = "Command-line access to the FinAut API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::RetrieveToken {
            connection,
            output_token_format,
        } => {
            let client = build_client(&connection)?;
            let token = client.retrieve_token()?;
            match output_token_format {
                OutputTokenFormat::Plain => println!("{}", token.access_token()),
                OutputTokenFormat::Json => println!("{}", serde_json::to_string_pretty(&token)?),
            }
            Ok(())
        }
        Commands::ListUsers {
            connection,
            persnr,
            employee_alias,
            page,
        } => {
            let client = build_client(&connection)?;
            let query = UserQuery {
                persnr,
                employee_alias,
                page,
                ..Default::default()
            };
            let users = client.users().list(&query)?;
            println!("{}", serde_json::to_string_pretty(&users)?);
            Ok(())
        }
        Commands::ListCompanies { connection, page } => {
            let client = build_client(&connection)?;
            let companies = client.companies().list(page)?;
            println!("{}", serde_json::to_string_pretty(&companies)?);
            Ok(())
        }
        Commands::GetUser {
            connection,
            user_id,
        } => {
            let client = build_client(&connection)?;
            let user = client.users().get(user_id)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(())
        }
        Commands::GenTestPersnr => {
            for persnr in generate_test_persnrs() {
                println!("{persnr}");
            }
            Ok(())
        }
    }
}

fn build_client(connection: &ConnectionArgs) -> Result<FinAutClient, Box<dyn Error>> {
    if connection.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }
    let config = connection.to_config()?;
    let client = FinAutClient::new(config).map_err(|e| format!("error creating http client: {e}"))?;
    Ok(client)
}

//! calshare-client CLI entry point.

use calshare_client::cli::{Cli, Commands, OutputFormat};
use calshare_client::client::events::ListEventsQuery;
use calshare_client::client::CalshareClient;
use calshare_client::output::{format_output, pretty};
use calshare_core::calendar::{CreateEventRequest, UpdateEventRequest, UpdateScheduleRequest};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = CalshareClient::new(&cli.base_url);

    match cli.command {
        Commands::Users(users_cmd) => {
            use calshare_client::cli::users::UsersAction;
            match users_cmd.action {
                UsersAction::Create {
                    email,
                    display_name,
                } => {
                    let user = client.create_user(&email, &display_name).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&user, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Created:\n{}", pretty::format_user(&user))
                        }
                    }
                }
                UsersAction::Get { id } => {
                    let user = client.get_user(&id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&user, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_user(&user)),
                    }
                }
                UsersAction::Events { id } => {
                    let events = client.list_user_events(&id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&events, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
                    }
                }
                UsersAction::Schedules { id } => {
                    let schedules = client.list_user_schedules(&id).await?;
                    match cli.format {
                        OutputFormat::Json => {
                            println!("{}", format_output(&schedules, cli.format))
                        }
                        OutputFormat::Pretty => {
                            println!("{}", pretty::format_schedules(&schedules))
                        }
                    }
                }
            }
        }
        Commands::Schedules(schedules_cmd) => {
            use calshare_client::cli::schedules::SchedulesAction;
            match schedules_cmd.action {
                SchedulesAction::Create { user_id, name } => {
                    let created = client.create_schedule(&user_id, &name).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&created, cli.format)),
                        OutputFormat::Pretty => println!("Created schedule {}", created.id),
                    }
                }
                SchedulesAction::Get { id } => {
                    let schedule = client.get_schedule(&id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&schedule, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_schedule(&schedule)),
                    }
                }
                SchedulesAction::Update { id, name, user_id } => {
                    let schedule = client
                        .update_schedule(&id, UpdateScheduleRequest { user_id, name })
                        .await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&schedule, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Updated:\n{}", pretty::format_schedule(&schedule))
                        }
                    }
                }
                SchedulesAction::Delete { id } => {
                    client.delete_schedule(&id).await?;
                    if !cli.quiet {
                        println!("Deleted schedule {}", id);
                    }
                }
                SchedulesAction::Events { id, start, end } => {
                    let events = client.list_schedule_events(&id, start.zip(end)).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&events, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
                    }
                }
                SchedulesAction::Availability { id, start, end } => {
                    let available = client.check_availability(&id, start, end).await?;
                    match cli.format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::json!({ "available": available }))
                        }
                        OutputFormat::Pretty if available => println!("Slot is free"),
                        OutputFormat::Pretty => println!("Slot is taken"),
                    }
                }
            }
        }
        Commands::Events(events_cmd) => {
            use calshare_client::cli::events::EventsAction;
            match events_cmd.action {
                EventsAction::Create {
                    user_id,
                    name,
                    start,
                    end,
                    color_code,
                    classification,
                    schedule_id,
                    schedule_name,
                    share_with,
                } => {
                    let mut request = CreateEventRequest::new(
                        user_id,
                        name,
                        start,
                        end,
                        color_code,
                        classification,
                    );
                    if let Some(schedule_id) = schedule_id {
                        request = request.in_schedule(schedule_id);
                    }
                    if let Some(schedule_name) = schedule_name {
                        request = request.with_schedule_name(schedule_name);
                    }
                    if let Some(email) = share_with {
                        request = request.share_with(email);
                    }
                    let created = client.create_event(request).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&created, cli.format)),
                        OutputFormat::Pretty => println!("Created event {}", created.id),
                    }
                }
                EventsAction::List {
                    color_code,
                    classification,
                    user_id,
                    start_date,
                    end_date,
                } => {
                    let events = client
                        .list_events(&ListEventsQuery {
                            color_code,
                            classification,
                            user_id,
                            start_date,
                            end_date,
                        })
                        .await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&events, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
                    }
                }
                EventsAction::Get { id } => {
                    let event = client.get_event(&id).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&event, cli.format)),
                        OutputFormat::Pretty => println!("{}", pretty::format_event(&event)),
                    }
                }
                EventsAction::Update {
                    id,
                    name,
                    start,
                    end,
                    color_code,
                    classification,
                } => {
                    let event = client
                        .update_event(
                            &id,
                            UpdateEventRequest {
                                name,
                                start,
                                end,
                                color_code,
                                classification,
                            },
                        )
                        .await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&event, cli.format)),
                        OutputFormat::Pretty => {
                            println!("Updated:\n{}", pretty::format_event(&event))
                        }
                    }
                }
                EventsAction::Delete { id } => {
                    client.delete_event(&id).await?;
                    if !cli.quiet {
                        println!("Deleted event {}", id);
                    }
                }
            }
        }
        Commands::Requests(requests_cmd) => {
            use calshare_client::cli::requests::RequestsAction;
            let request = match requests_cmd.action {
                RequestsAction::List { email } => {
                    let requests = client.list_requests(&email).await?;
                    match cli.format {
                        OutputFormat::Json => println!("{}", format_output(&requests, cli.format)),
                        OutputFormat::Pretty => {
                            println!("{}", pretty::format_requests(&requests))
                        }
                    }
                    return Ok(());
                }
                RequestsAction::Accept { id, user_id } => {
                    client.accept_request(&id, &user_id).await?
                }
                RequestsAction::Reject { id, user_id } => {
                    client.reject_request(&id, &user_id).await?
                }
            };
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&request, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_request(&request)),
            }
        }
        Commands::Health(health_cmd) => {
            use calshare_client::cli::health::HealthAction;
            match health_cmd.action {
                HealthAction::Livez => {
                    client.livez().await?;
                    if !cli.quiet {
                        println!("ok");
                    }
                }
            }
        }
    }

    Ok(())
}

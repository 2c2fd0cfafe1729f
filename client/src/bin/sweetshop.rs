//! Interactive shell over the sweet shop controllers.
//!
//! Reads the session store at startup: a persisted session goes straight to
//! the inventory view, otherwise the login/registration prompts run first.
//! Logout drops back to the auth prompts.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sweetshop_client::{
    Api, AuthFlow, AuthState, CreateSweet, Inventory, RegisterUser, SessionStore, Sweet,
    UpdateSweet, UreqTransport,
};

#[derive(Parser)]
#[command(name = "sweetshop", about = "Sweet shop storefront management client")]
struct Args {
    /// Base URL of the sweet shop backend.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Where the session (token + username) is persisted.
    #[arg(long, default_value = ".sweetshop-session.json")]
    session_file: String,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let session = Arc::new(SessionStore::open(&args.session_file));
    let api = Arc::new(Api::new(
        &args.base_url,
        Box::new(UreqTransport::new()),
        session.clone(),
    ));
    let mut auth = AuthFlow::new(api.clone(), session.clone());

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        while auth.state() != AuthState::LoggedIn {
            match prompt(&mut input, "login, register or quit (l/r/q)? ")? {
                Some(choice) => match choice.as_str() {
                    "l" => {
                        let username = prompt_required(&mut input, "username: ")?;
                        let password = prompt_required(&mut input, "password: ")?;
                        auth.submit_login(&username, &password);
                    }
                    "r" => {
                        let user = RegisterUser {
                            username: prompt_required(&mut input, "username: ")?,
                            email: prompt_required(&mut input, "email: ")?,
                            password: prompt_required(&mut input, "password: ")?,
                        };
                        auth.submit_register(&user);
                    }
                    "q" => return Ok(()),
                    _ => continue,
                },
                None => return Ok(()),
            }
            if let Some(error) = auth.error() {
                println!("error: {error}");
            }
        }

        let username = session.get().map(|s| s.username).unwrap_or_default();
        println!("Welcome, {username}!");

        let mut inventory = Inventory::new(api.clone());
        inventory.refresh();
        render(&inventory);

        loop {
            let line = match prompt(&mut input, "> ")? {
                Some(line) => line,
                None => return Ok(()),
            };
            let (command, rest) = split_command(&line);
            match command {
                "" => continue,
                "help" => print_help(),
                "list" => {
                    inventory.refresh();
                    render(&inventory);
                }
                "search" => {
                    inventory.search(rest);
                    render(&inventory);
                }
                "add" => {
                    match read_new_sweet(&mut input)? {
                        Some(sweet) => inventory.create(&sweet),
                        None => println!("cancelled"),
                    }
                    report(&inventory);
                    render(&inventory);
                }
                "edit" => match rest.parse::<i64>() {
                    Ok(id) => {
                        match read_sweet_patch(&mut input)? {
                            Some(patch) => inventory.update(id, &patch),
                            None => println!("nothing to change"),
                        }
                        report(&inventory);
                        render(&inventory);
                    }
                    Err(_) => println!("usage: edit <id>"),
                },
                "rm" => match rest.parse::<i64>() {
                    Ok(id) => {
                        let confirmed = prompt(&mut input, "delete this sweet (y/N)? ")?
                            .is_some_and(|answer| answer.eq_ignore_ascii_case("y"));
                        inventory.delete(id, confirmed);
                        report(&inventory);
                        render(&inventory);
                    }
                    Err(_) => println!("usage: rm <id>"),
                },
                "buy" => match rest.parse::<i64>() {
                    Ok(id) => {
                        if inventory
                            .sweets()
                            .iter()
                            .any(|s| s.id == id && s.is_out_of_stock())
                        {
                            println!("Out of Stock");
                        } else {
                            inventory.purchase(id);
                            report(&inventory);
                            render(&inventory);
                        }
                    }
                    Err(_) => println!("usage: buy <id>"),
                },
                "logout" => {
                    auth.logout();
                    println!("logged out");
                    break;
                }
                "quit" | "exit" => return Ok(()),
                other => println!("unknown command: {other} (try 'help')"),
            }
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  list            reload the full sweet list");
    println!("  search <name>   filter by name (empty shows everything)");
    println!("  add             create a new sweet");
    println!("  edit <id>       update fields of a sweet");
    println!("  rm <id>         delete a sweet (asks for confirmation)");
    println!("  buy <id>        purchase one unit");
    println!("  logout          clear the session");
    println!("  quit            exit");
}

fn render(inventory: &Inventory) {
    if let Some(banner) = inventory.banner() {
        println!("error: {banner}");
    }
    if inventory.sweets().is_empty() {
        if inventory.banner().is_none() {
            println!("No sweets available. Add some to get started!");
        }
        return;
    }
    for sweet in inventory.sweets() {
        render_card(sweet);
    }
}

fn render_card(sweet: &Sweet) {
    let stock = if sweet.is_out_of_stock() {
        "Out of Stock".to_string()
    } else {
        format!("Stock: {}", sweet.quantity)
    };
    println!(
        "#{} {} ({}) | {:.2} | {}",
        sweet.id, sweet.name, sweet.category, sweet.price, stock
    );
    if let Some(description) = &sweet.description {
        println!("    {description}");
    }
}

fn report(inventory: &Inventory) {
    if let Some(notice) = inventory.notice() {
        println!("{notice}");
    }
}

fn read_new_sweet(input: &mut impl BufRead) -> io::Result<Option<CreateSweet>> {
    let name = prompt_required(input, "name: ")?;
    let category = prompt_required(input, "category: ")?;
    let Some(price) = parse_prompt::<f64>(input, "price: ")? else {
        return Ok(None);
    };
    let Some(quantity) = parse_prompt::<u32>(input, "quantity: ")? else {
        return Ok(None);
    };
    let description = prompt(input, "description (optional): ")?
        .filter(|text| !text.is_empty());
    Ok(Some(CreateSweet {
        name,
        category,
        price,
        quantity,
        description,
    }))
}

/// Blank answers keep the current value.
fn read_sweet_patch(input: &mut impl BufRead) -> io::Result<Option<UpdateSweet>> {
    let mut patch = UpdateSweet::default();
    patch.name = prompt(input, "name (blank to keep): ")?.filter(|t| !t.is_empty());
    patch.category = prompt(input, "category (blank to keep): ")?.filter(|t| !t.is_empty());
    if let Some(text) = prompt(input, "price (blank to keep): ")?.filter(|t| !t.is_empty()) {
        match text.parse() {
            Ok(price) => patch.price = Some(price),
            Err(_) => {
                println!("not a number: {text}");
                return Ok(None);
            }
        }
    }
    if let Some(text) = prompt(input, "quantity (blank to keep): ")?.filter(|t| !t.is_empty()) {
        match text.parse() {
            Ok(quantity) => patch.quantity = Some(quantity),
            Err(_) => {
                println!("not a number: {text}");
                return Ok(None);
            }
        }
    }
    patch.description = prompt(input, "description (blank to keep): ")?.filter(|t| !t.is_empty());
    let empty = patch.name.is_none()
        && patch.category.is_none()
        && patch.price.is_none()
        && patch.quantity.is_none()
        && patch.description.is_none();
    Ok(if empty { None } else { Some(patch) })
}

fn parse_prompt<T: std::str::FromStr>(
    input: &mut impl BufRead,
    label: &str,
) -> io::Result<Option<T>> {
    match prompt(input, label)? {
        Some(text) => match text.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                println!("not a number: {text}");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn prompt_required(input: &mut impl BufRead, label: &str) -> io::Result<String> {
    Ok(prompt(input, label)?.unwrap_or_default())
}

/// One trimmed line from stdin; `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

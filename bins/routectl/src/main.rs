//! routectl - manipulate tunnel routes from the command line.

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use tunroute::{Family, RouteEntry, default_route_ops};

#[derive(Parser)]
#[command(name = "routectl", version, about = "Tunnel route management tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up the route used to reach a destination.
    Get {
        /// Destination address.
        dst: IpAddr,
    },

    /// Install a host route, replacing any existing one.
    Replace(RouteArgs),

    /// Remove a host route.
    Delete(RouteArgs),
}

#[derive(Args)]
struct RouteArgs {
    /// Destination address.
    dst: IpAddr,

    /// Next-hop gateway address.
    #[arg(long)]
    via: Option<IpAddr>,

    /// Output device name.
    #[arg(long)]
    dev: Option<String>,

    /// Preferred source address.
    #[arg(long)]
    src: Option<IpAddr>,
}

impl RouteArgs {
    fn into_route(self) -> anyhow::Result<RouteEntry> {
        let mut route = RouteEntry::new(Family::of(&self.dst)).with_destination(self.dst);
        route.gateway = self.via;
        route.source = self.src;
        if let Some(dev) = self.dev {
            route.oif_index = Some(tunroute::ifname::name_to_index(&dev)?);
            route.oif_name = Some(dev);
        }
        Ok(route)
    }
}

fn render(route: &RouteEntry) -> String {
    if let Some(text) = &route.command_text {
        return text.clone();
    }

    let mut out = match route.destination {
        Some(dst) => dst.to_string(),
        None => "default".to_string(),
    };
    if let Some(gw) = route.gateway {
        out.push_str(&format!(" via {}", gw));
    }
    if let Some(name) = &route.oif_name {
        out.push_str(&format!(" dev {}", name));
    } else if let Some(index) = route.oif_index {
        out.push_str(&format!(" dev if{}", index));
    }
    if let Some(src) = route.source {
        out.push_str(&format!(" src {}", src));
    }
    out
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut ops = default_route_ops()?;

    match cli.command {
        Command::Get { dst } => {
            let route = ops.get(&dst)?;
            println!("{}", render(&route));
        }
        Command::Replace(args) => {
            ops.replace(&args.into_route()?)?;
        }
        Command::Delete(args) => {
            ops.delete(&args.into_route()?)?;
        }
    }

    Ok(())
}

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use storewalk_commerce::{InMemoryCommerce, perform};
use storewalk_controls::ControlEvent;
use storewalk_render::{DebugTextRenderer, RenderView, Renderer};
use storewalk_store::{Assortment, CardAction, Catalog, StoreConfig, Walkthrough};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storewalk-cli", about = "Virtual store walkthrough tools")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Store config (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Product catalog JSON; the built-in assortment is used without it
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the active configuration summary
    Info,
    /// Print the planned store
    Layout {
        /// List every stocked slot
        #[arg(long)]
        slots: bool,
    },
    /// Lock the pointer, then replay scripted look and movement
    Walk {
        /// Frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Horizontal pointer motion per frame, in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dx: f32,
        /// Vertical pointer motion per frame, in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dy: f32,
        /// Hold these keys (DOM codes, e.g. KeyW,ArrowLeft,KeyQ)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Reject the lock request instead of granting it
        #[arg(long)]
        deny_lock: bool,
    },
    /// Show the product card for a slot and optionally act on it
    Card {
        #[arg(long)]
        slot: usize,
        /// Add to cart
        #[arg(long)]
        cart: bool,
        /// Add to wishlist
        #[arg(long)]
        wishlist: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StoreConfig> {
    match path {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(StoreConfig::default()),
    }
}

fn load_assortment(path: Option<&Path>) -> anyhow::Result<Assortment> {
    match path {
        Some(path) => {
            let catalog = Catalog::load(path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            tracing::info!(products = catalog.len(), "catalog loaded");
            Ok(Assortment::from_catalog(&catalog))
        }
        None => Ok(Assortment::featured()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_deref())?;
    let assortment = load_assortment(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("storewalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("products: {}", assortment.len());
            let s = &config.shelving;
            println!(
                "shelving: {} rows x {} levels x {} slots",
                s.rows, s.levels, s.slots_per_shelf
            );
            println!(
                "look: speed={} polar=[{:.3}, {:.3}]",
                config.look.pointer_speed, config.look.min_polar_angle, config.look.max_polar_angle
            );
            let l = &config.locomotion;
            println!(
                "locomotion: damping={} acceleration={} height=[{}, {}]",
                l.damping, l.acceleration, l.min_height, l.max_height
            );
        }
        Commands::Layout { slots } => {
            let walk = Walkthrough::new(config, &assortment);
            let renderer = if slots {
                DebugTextRenderer::new().with_slots()
            } else {
                DebugTextRenderer::new()
            };
            print!("{}", renderer.render(walk.plan(), &view_of(&walk)));
        }
        Commands::Walk {
            frames,
            dt,
            dx,
            dy,
            keys,
            deny_lock,
        } => {
            let mut walk = Walkthrough::new(config, &assortment);
            for key in &keys {
                if !walk.key(key, true) {
                    tracing::warn!(key = %key, "not a movement key");
                }
            }

            walk.request_lock();
            walk.resolve_lock(!deny_lock);
            report(0, &walk.step(0.0));
            if !walk.is_locked() {
                println!("pointer lock unavailable; nothing to do");
                return Ok(());
            }

            for frame in 1..=frames {
                if dx != 0.0 || dy != 0.0 {
                    walk.pointer_motion(dx, dy);
                }
                let events = walk.step(dt);
                if frame == frames || events.iter().any(|e| *e != ControlEvent::Change) {
                    report(frame, &events);
                }
            }

            let (pos, look) = walk.pose();
            println!(
                "pose: pos=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3}",
                pos.x, pos.y, pos.z, look.yaw, look.pitch
            );
            match walk.pick_center() {
                Some(slot) => println!(
                    "looking at slot {}: {}",
                    slot.index,
                    slot.product.as_ref().map_or("", |p| p.title.as_str())
                ),
                None => println!("looking at nothing"),
            }

            walk.lock_released();
            report(frames + 1, &walk.step(0.0));
        }
        Commands::Card {
            slot,
            cart,
            wishlist,
        } => {
            let walk = Walkthrough::new(config, &assortment);
            let Some(found) = walk.plan().slot(slot) else {
                bail!("slot {slot} out of range (0..{})", walk.plan().slots.len());
            };
            let Some(card) = walk.card(found) else {
                bail!("slot {slot} is empty");
            };
            println!("{card}");

            let mut shop = InMemoryCommerce::new();
            let actions = [(cart, CardAction::AddToCart), (wishlist, CardAction::AddToWishlist)];
            for (_, action) in actions.into_iter().filter(|(wanted, _)| *wanted) {
                if let Some((list, receipt)) = perform(&mut shop, action, &card)? {
                    println!("{}", receipt.message(list));
                }
            }
            print_lists(&shop)?;
        }
    }

    Ok(())
}

fn view_of(walk: &Walkthrough) -> RenderView {
    let camera = walk.camera();
    RenderView::new(camera.position, camera.rotation, camera.fov_degrees).with_lock(walk.is_locked())
}

fn report(frame: u32, events: &[ControlEvent]) {
    let changes = events.iter().filter(|e| **e == ControlEvent::Change).count();
    for event in events.iter().filter(|e| **e != ControlEvent::Change) {
        println!("frame {frame}: {event:?}");
    }
    if changes > 0 {
        println!("frame {frame}: {changes} change(s)");
    }
}

fn print_lists(shop: &InMemoryCommerce) -> anyhow::Result<()> {
    for request in shop.cart() {
        println!("POST {} {}", storewalk_commerce::CART_ADD_PATH, request.to_json()?);
    }
    for request in shop.wishlist() {
        println!("POST {} {}", storewalk_commerce::WISHLIST_ADD_PATH, request.to_json()?);
    }
    Ok(())
}

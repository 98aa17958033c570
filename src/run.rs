/// CLI dispatch for intentbot
///
/// Subcommands:
///   preview  "<command>"            derive the call payload, execute nothing
///   simulate "<command>"            execute against the in-memory ledger
///   decode   0x<payload>            reconstruct the command phrase
///   verify   "<command>" 0x<bytes>  prove intent and operation identical
///   resolve  <name>                 resolve an account name
///   balance  <account> <asset>      balance in a named asset
///   supply   <asset>                total circulating amount
use anyhow::{ anyhow, Context, Result };

use crate::amount::{ address_to_hex, bytes_to_address, hex_to_bytes, parse_amount };
use crate::arguments;
use crate::assets::BUILTIN_ASSETS;
use crate::configs::{ read_configs, Configs };
use crate::constants::{ DAI, NATIVE_ASSET, RETH, USDC, USDT, WBTC, WETH, WSTETH };
use crate::engine::{ Engine, ExecutionReceipt };
use crate::ledger::{ MemoryLedger, TokenMeta };
use crate::logger::{ self, LogTag };
use crate::names::StaticNameResolver;
use crate::paths;
use crate::registry::Registry;
use alloy_primitives::{ Address, U256 };

pub fn run() -> Result<()> {
    let positional = arguments::positional_args();
    let Some(mode) = positional.first() else {
        print_help();
        return Ok(());
    };

    match mode.as_str() {
        "preview" => {
            let intent = positional
                .get(1)
                .ok_or_else(|| anyhow!("preview needs a command string"))?;
            let engine = build_engine()?;
            let payload = engine.preview(intent)?;
            println!("0x{}", render_hex(&payload));
            Ok(())
        }
        "simulate" => {
            let intent = positional
                .get(1)
                .ok_or_else(|| anyhow!("simulate needs a command string"))?;
            let mut engine = build_engine()?;
            // All-or-nothing: discard every effect when the invocation fails
            let checkpoint = engine.ledger().snapshot();
            match engine.execute(intent) {
                Ok(receipt) => {
                    report_receipt(&receipt);
                    Ok(())
                }
                Err(e) => {
                    engine.ledger_mut().restore(checkpoint);
                    Err(e.into())
                }
            }
        }
        "decode" => {
            let hex = positional
                .get(1)
                .ok_or_else(|| anyhow!("decode needs a payload hex string"))?;
            let engine = build_engine()?;
            let payload = hex_to_bytes(hex)?;
            println!("{}", engine.decode_payload(&payload)?);
            Ok(())
        }
        "verify" => {
            let intent = positional
                .get(1)
                .ok_or_else(|| anyhow!("verify needs a command string"))?;
            let hex = positional
                .get(2)
                .ok_or_else(|| anyhow!("verify needs an operation payload"))?;
            let engine = build_engine()?;
            let operation = hex_to_bytes(hex)?;
            if engine.verify(intent, &operation)? {
                println!("OK: operation matches intent");
                Ok(())
            } else {
                Err(anyhow!("MISMATCH: operation does not match intent"))
            }
        }
        "resolve" => {
            let name = positional
                .get(1)
                .ok_or_else(|| anyhow!("resolve needs an account name"))?;
            let engine = build_engine()?;
            match engine.resolve_name(name) {
                Some(resolved) => {
                    println!("{} ({})", address_to_hex(resolved.account), resolved.source);
                    Ok(())
                }
                None => Err(anyhow!("unresolvable account name '{}'", name)),
            }
        }
        "balance" => {
            let account = positional
                .get(1)
                .ok_or_else(|| anyhow!("balance needs an account"))?;
            let asset = positional
                .get(2)
                .ok_or_else(|| anyhow!("balance needs an asset name"))?;
            let engine = build_engine()?;
            let view = engine.balance_of(account, asset)?;
            println!("{} {} (raw {})", view.adjusted, asset, view.raw);
            Ok(())
        }
        "supply" => {
            let asset = positional
                .get(1)
                .ok_or_else(|| anyhow!("supply needs an asset name"))?;
            let engine = build_engine()?;
            let view = engine.total_supply_of(asset)?;
            println!("{} {} (raw {})", view.adjusted, asset, view.raw);
            Ok(())
        }
        other => {
            print_help();
            Err(anyhow!("unknown mode '{}'", other))
        }
    }
}

fn report_receipt(receipt: &ExecutionReceipt) {
    match receipt {
        ExecutionReceipt::Sent { to, amount, asset } => {
            logger::info(
                LogTag::Command,
                &format!(
                    "sent {} of {} to {}",
                    amount,
                    address_to_hex(*asset),
                    address_to_hex(*to)
                )
            );
        }
        ExecutionReceipt::Swapped(outcome) => {
            logger::info(
                LogTag::Command,
                &format!(
                    "swapped {} in for {} out via {} (fee {})",
                    outcome.amount_in,
                    outcome.amount_out,
                    address_to_hex(outcome.venue),
                    outcome.fee
                )
            );
        }
    }
}

/// Build the engine from configs.json: registry snapshot, static resolver and
/// the seeded in-memory ledger
pub fn build_engine() -> Result<Engine<MemoryLedger>> {
    let configs = read_configs(arguments::configs_path()).map_err(|e|
        anyhow!("failed to read configs: {}", e)
    )?;
    let governor = parse_address(&configs.governor).context("governor account")?;
    let registry = Registry::with_storage(governor, paths::get_registry_path());
    let resolver = StaticNameResolver::from_configs(&configs)?;
    let ledger = seed_ledger(&configs)?;
    let engine = Engine::from_configs(&configs, registry, Box::new(resolver), ledger)?;
    Ok(engine)
}

/// In-memory ledger with the built-in assets deployed plus the configured
/// simulation seed state
fn seed_ledger(configs: &Configs) -> Result<MemoryLedger> {
    let mut ledger = MemoryLedger::new();
    for (address, symbol, name, decimals) in [
        (WETH, "WETH", "Wrapped Ether", 18u8),
        (USDC, "USDC", "USD Coin", 6),
        (USDT, "USDT", "Tether USD", 6),
        (DAI, "DAI", "Dai Stablecoin", 18),
        (WBTC, "WBTC", "Wrapped BTC", 8),
        (WSTETH, "wstETH", "Wrapped liquid staked Ether 2.0", 18),
        (RETH, "rETH", "Rocket Pool ETH", 18),
    ] {
        ledger.register_token(address, TokenMeta {
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            total_supply: U256::ZERO,
        });
    }

    for seed in &configs.simulation.accounts {
        let account = parse_address(&seed.address)?;
        if !seed.native.is_empty() {
            ledger.set_native_balance(account, parse_amount(&seed.native, 18)?);
        }
        for (asset_name, amount) in &seed.tokens {
            let (asset, decimals) = lookup_builtin(asset_name)?;
            ledger.set_token_balance(asset, account, parse_amount(amount, decimals)?);
        }
    }

    for seed in &configs.simulation.pools {
        let (asset_a, decimals_a) = lookup_builtin(&seed.asset_a)?;
        let (asset_b, decimals_b) = lookup_builtin(&seed.asset_b)?;
        let venue = ledger.register_venue(asset_a, asset_b, seed.fee);
        ledger.set_token_balance(asset_a, venue, parse_amount(&seed.reserve_a, decimals_a)?);
        ledger.set_token_balance(asset_b, venue, parse_amount(&seed.reserve_b, decimals_b)?);
        logger::debug(
            LogTag::Ledger,
            &format!(
                "seeded venue {} for {}/{} (fee {})",
                address_to_hex(venue),
                seed.asset_a,
                seed.asset_b,
                seed.fee
            )
        );
    }

    Ok(ledger)
}

/// Builtin lookup for seed entries; native maps to its wrapped venue form
fn lookup_builtin(name: &str) -> Result<(Address, u8)> {
    let key = name.to_lowercase();
    let (address, decimals) = BUILTIN_ASSETS.get(key.as_str()).ok_or_else(||
        anyhow!("unknown seed asset '{}'", name)
    )?;
    if *address == NATIVE_ASSET {
        return Ok((WETH, 18));
    }
    Ok((*address, *decimals))
}

fn parse_address(text: &str) -> Result<Address> {
    let bytes = hex_to_bytes(text)?;
    Ok(bytes_to_address(&bytes)?)
}

fn render_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub fn print_help() {
    println!("intentbot - text-to-transaction engine");
    println!();
    println!("USAGE:");
    println!("  intentbot preview  \"send 20 dai to vitalik\"");
    println!("  intentbot simulate \"swap 1 eth to 2500 dai\"");
    println!("  intentbot decode   0x<payload>");
    println!("  intentbot verify   \"<command>\" 0x<payload>");
    println!("  intentbot resolve  vitalik");
    println!("  intentbot balance  <account|name> <asset>");
    println!("  intentbot supply   <asset>");
    println!();
    println!("FLAGS:");
    println!("  --configs <path>   configs file (default configs.json)");
    println!("  --debug-<module>   debug output for one module (command, router, swap, ...)");
    println!("  --verbose          debug output for every module");
    println!("  --quiet            errors only");
}

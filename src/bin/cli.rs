//! Interactive control shell.
//!
//! Runs against the simulated driver so it works without vendor hardware;
//! swap in a real `Driver` implementation to drive a physical camera.
//! Mutations are fire-and-forget: they are queued for the device worker and
//! observed later through `prop get`.

use std::io::{self, BufRead, Write};

use tethercam::properties::PropertyId;
use tethercam::testing::SimulatedDriver;
use tethercam::{CameraSystem, TetherConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tethercam::init_logging();

    let config = TetherConfig::load_or_default();
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(2)), config);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("#");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let args: Vec<&str> = line.split_whitespace().collect();

        match args.first().copied() {
            Some("prop") => cmd_prop(&system, &args),
            Some("ui") => cmd_ui(&system, &args),
            Some("session") => cmd_session(&system, &args),
            Some("camera") => cmd_camera(&mut system, &args),
            Some("info") => cmd_info(&system),
            Some("help") => print_help(),
            Some("exit") => break,
            Some(_) | None => {
                println!("error: wrong command, enter `help` to get commands list");
            }
        }
    }

    Ok(())
}

fn cmd_prop(system: &CameraSystem, args: &[&str]) {
    let Some(camera) = system.camera() else {
        println!("error: camera is not set");
        return;
    };

    match args {
        ["prop", "get", name] => match name.parse::<PropertyId>() {
            Ok(prop) => println!("{}: {}", prop, camera.property_display(prop)),
            Err(()) => println!("error: unknown property"),
        },
        ["prop", "show", name] => match name.parse::<PropertyId>() {
            Ok(prop) if prop.is_settable() => {
                for (i, choice) in camera.property_choices(prop).iter().enumerate() {
                    println!("{}. {}", i + 1, choice);
                }
            }
            Ok(_) => println!("error: property is not settable"),
            Err(()) => println!("error: unknown property"),
        },
        ["prop", "set", name, index] => {
            let prop = match name.parse::<PropertyId>() {
                Ok(prop) => prop,
                Err(()) => {
                    println!("error: unknown property");
                    return;
                }
            };
            let index: usize = match index.parse() {
                Ok(index) => index,
                Err(_) => {
                    println!("error: index must be a number");
                    return;
                }
            };
            match camera.set_property_index(prop, index) {
                Ok(()) => println!("set {} queued; `prop get {}` to observe", prop, prop),
                Err(e) => println!("error: {}", e),
            }
        }
        _ => println!("error: wrong number of arguments"),
    }
}

fn cmd_ui(system: &CameraSystem, args: &[&str]) {
    let Some(camera) = system.camera() else {
        println!("error: camera is not set");
        return;
    };

    match args {
        ["ui", "lock"] => {
            camera.lock_ui();
            println!("ui lock queued");
        }
        ["ui", "unlock"] => {
            camera.unlock_ui();
            println!("ui unlock queued");
        }
        [_, _] => println!("error: unknown argument"),
        _ => println!("error: wrong number of arguments"),
    }
}

fn cmd_session(system: &CameraSystem, args: &[&str]) {
    let Some(camera) = system.camera() else {
        println!("error: camera is not set");
        return;
    };

    match args {
        ["session", "open"] => {
            camera.open_session();
            println!("session open queued");
        }
        ["session", "close"] => {
            camera.close_session();
            println!("session close queued");
        }
        [_, _] => println!("error: unknown argument"),
        _ => println!("error: wrong number of arguments"),
    }
}

fn cmd_camera(system: &mut CameraSystem, args: &[&str]) {
    match args {
        ["camera", "list"] => match system.list_devices() {
            Ok(devices) => {
                for (i, device) in devices.iter().enumerate() {
                    println!("{}. {}", i + 1, device.name);
                }
            }
            Err(e) => println!("error: {}", e),
        },
        ["camera", "set", index] => {
            let index: usize = match index.parse() {
                Ok(index) => index,
                Err(_) => {
                    println!("error: index must be a number");
                    return;
                }
            };
            match system.select_device(index) {
                Ok(()) => {
                    let camera = system.camera().expect("just selected");
                    println!(
                        "selected {} (serial {})",
                        camera.get_product_name(),
                        camera.get_serial_number()
                    );
                }
                Err(e) => println!("error: {}", e),
            }
        }
        ["camera", "reset"] => {
            system.reset();
            println!("camera reset");
        }
        _ => println!("error: wrong number of arguments"),
    }
}

fn cmd_info(system: &CameraSystem) {
    match serde_json::to_string_pretty(&tethercam::get_info()) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("error: {}", e),
    }
    if let Some(camera) = system.camera() {
        match serde_json::to_string_pretty(camera.descriptor()) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("error: {}", e),
        }
    }
}

fn print_help() {
    println!("\t- prop show <property> - print available values of <property> with corresponding indices");
    println!("\t- prop get <property> - print current value of <property>");
    println!("\t- prop set <property> <num> - queue a new value for <property>, <num> is the 1-based index from `prop show`");
    println!("\t- ui lock - lock ui on current camera");
    println!("\t- ui unlock - unlock ui on current camera");
    println!("\t- session open - explicitly open session with current camera");
    println!("\t- session close - explicitly close session with current camera");
    println!("\t- camera list - print a list of connected cameras with corresponding indices");
    println!("\t- camera set <num> - select the current camera by its index in the list");
    println!("\t- camera reset - reset current camera");
    println!("\t- info - print crate and selected-camera info as JSON");
    println!("\t- exit - close application");
    println!();
    println!("\t<property> can be one of:");
    println!("\tget: camera | serial | firmware | storage | ae | af_mode | quality | lens");
    println!("\tget | set | show: wb | temperature | color_space | drive_mode | metering_mode | av | tv | iso | exp_compensation");
}

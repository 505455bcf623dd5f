#![deny(clippy::all)]
#![allow(dead_code)]

#[macro_use]
extern crate log;

use simplelog::LevelFilter;
use simplelog::SimpleLogger;

use winsys::connection::Connection;
use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

use anyhow::Context;

use std::process;

#[macro_use]
mod defaults;

mod drag;
mod model;
mod placement;

use model::Model;

pub fn main() -> Result<()> {
    SimpleLogger::init(
        if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        simplelog::Config::default(),
    )?;

    let (conn, screen_num) =
        x11rb::connect(None).context("unable to connect to the X server, is it running?")?;

    let xconn = XConnection::new(&conn, screen_num)?;

    info!(concat!("starting ", WM_NAME!()));
    let res = Model::new(&xconn).run();

    xconn.cleanup();

    if let Err(err) = res {
        warn!("{:#}", err);
        process::exit(1);
    }

    Ok(())
}

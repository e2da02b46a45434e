//! `pixiecore` binary.
//!
//! Ships no boot loader images and no network engine of its own: the boot
//! service below prints the resolved configuration and exits. Embedders that
//! bundle iPXE builds register them in [`FirmwareBinaries`] and pass their own
//! [`BootService`] to [`pixiecore::cli`].
//!
//! ```sh
//! pixiecore boot vmlinuz initrd.img --cmdline console=ttyS0 -p 8080
//! PIXIECORE_PORT=8080 pixiecore api http://boot.example --ipxe-bios undionly.kpxe
//! pixiecore -kernel vmlinuz -initrd a.img,b.img        # v1 syntax
//! ```

use std::error::Error;
use std::process::ExitCode;

use pixiecore::{BootService, Booter, FirmwareBinaries, ServerConfig};

/// Boot service that reports what it would serve.
struct PrintConfig;

impl BootService for PrintConfig {
    fn serve(
        &mut self,
        config: ServerConfig,
        booter: Booter,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        log::info!(
            "listening on {}:{}",
            config.bind_address(),
            config.http_port()
        );
        println!("{config}");
        match booter {
            Booter::Static {
                kernel,
                initrd,
                cmdline,
                message,
            } => {
                println!("kernel = {kernel}");
                if !initrd.is_empty() {
                    println!("initrd = {}", initrd.join(","));
                }
                if let Some(cmdline) = cmdline {
                    println!("cmdline = {cmdline}");
                }
                if let Some(message) = message {
                    println!("bootmsg = {message}");
                }
            }
            Booter::Api { url, timeout } => {
                println!("api = {url}");
                println!("api_request_timeout = {}s", timeout.as_secs());
            }
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    pixiecore::cli(&FirmwareBinaries::new(), &mut PrintConfig)
}

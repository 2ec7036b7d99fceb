use console::style;

use crate::core::doctor::{Doctor, SystemHost};
use crate::ui::print_diagnostic;

use super::AppCtx;

/// Print every diagnostic and return 0 when the quickstart can run.
pub fn run(ctx: &AppCtx) -> i32 {
    let report = Doctor::new(&ctx.env, &ctx.paths, SystemHost::new(&ctx.env)).run();
    for result in &report.results {
        print_diagnostic(result);
    }

    let code = report.exit_code();
    if code == 0 {
        println!("\n{}", style("All required checks passed.").green().bold());
    } else {
        println!(
            "\n{}",
            style("Some required checks failed; fix them before running the examples.")
                .red()
                .bold()
        );
    }
    code
}

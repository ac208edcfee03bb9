// Terminal output - Human-readable lines for each pipeline step

use crate::certificates::parser::CertificateChain;
use crate::pipeline::HarvestReport;
use colored::*;
use url::Url;

/// Format a list of names as `[a, b, c]`
pub fn format_names<S: AsRef<str>>(names: &[S]) -> String {
    let joined: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
    format!("[{}]", joined.join(", "))
}

/// Print a section header with consistent formatting
pub fn print_section_header(title: &str) {
    println!("\n{}", title.cyan().bold());
}

/// `url: [names]` after a chain was captured
pub fn print_fetched(url: &Url, chain: &CertificateChain) {
    println!("{}: {}", url.as_str().green(), format_names(&chain.simple_names()));
}

/// `[chain] -> [extracted]` after the extraction policy ran
pub fn print_extracted(chain: &CertificateChain, extracted: &CertificateChain) {
    println!(
        "{} -> {}",
        format_names(&chain.simple_names()),
        format_names(&extracted.simple_names()).bold()
    );
}

/// `from -(status)-> to` for each followed redirect
pub fn print_redirect(from: &Url, status: u16, to: &Url) {
    println!("{} -({})-> {}", from, status.to_string().yellow(), to);
}

/// Relative Location header made absolute
pub fn print_resolved(location: &str, resolved: &Url) {
    println!("Resolved redirect target \"{}\" to \"{}\"", location, resolved);
}

/// URL left out of the fetch stage, with the reason
pub fn print_skipped(url: &Url, reason: &str) {
    println!("{} {} ({})", "Skipping".yellow(), url, reason.dimmed());
}

pub fn print_saving(path: &std::path::Path) {
    println!("Saving truststore: {}", path.display());
}

pub fn print_done() {
    println!("{}", "Done".green().bold());
}

pub fn print_summary(report: &HarvestReport) {
    println!(
        "Endpoints: {}  Chains: {}  Certificates: {}",
        report.endpoints.to_string().green(),
        report.chains.to_string().green(),
        report.certificates.to_string().green().bold()
    );
    if report.skipped > 0 {
        println!(
            "{}",
            format!("Skipped after errors: {}", report.skipped).yellow()
        );
    }
}

//! Provider chain inspection

use anyhow::Result;

use finparse_core::ProviderClient;

pub fn cmd_providers() -> Result<()> {
    let chain = ProviderClient::chain_from_env();
    if chain.is_empty() {
        println!("No AI providers configured; extraction will be rule-based.");
        println!("Set GROQ_API_KEY, OPENAI_API_KEY, GEMINI_API_KEY, or COHERE_API_KEY.");
        return Ok(());
    }

    println!("Configured providers (tried in order):");
    for (i, provider) in chain.iter().enumerate() {
        use finparse_core::Provider;
        println!("  {}. {}", i + 1, provider.name());
    }
    Ok(())
}

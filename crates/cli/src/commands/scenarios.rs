//! `parlance scenarios`: List what the knowledge base covers.

use parlance_knowledge::KnowledgeStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = KnowledgeStore::builtin();

    println!("Languages:");
    for language in store.languages() {
        println!("  {:<10} ({})", language.as_str(), language.code());
    }

    println!("\nScenarios:");
    for scenario in store.scenarios() {
        let documents: usize = store
            .languages()
            .into_iter()
            .map(|language| store.for_pair(language, scenario).count())
            .sum();
        println!("  {:<16} {documents} documents", scenario.as_str());
    }

    Ok(())
}

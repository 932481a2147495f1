//! Prompt templates for classification and synthesis, per prompt language.

use consilium_core::taxonomy::{Language, Taxonomy};

/// System message sent with every request.
pub fn system_instruction(language: Language) -> &'static str {
    match language {
        Language::Romanian => "Ești un asistent util.",
        Language::English => "You are a helpful assistant.",
    }
}

fn category_listing(taxonomy: &Taxonomy) -> String {
    taxonomy
        .iter()
        .map(|c| format!("    - '{}' - {}", c.label, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the model to map `query` onto exactly one taxonomy label.
pub fn classification(language: Language, query: &str, taxonomy: &Taxonomy) -> String {
    let categories = category_listing(taxonomy);
    match language {
        Language::Romanian => format!(
            r#"Ești un asistent care analizează o interogare și o încadrează într-una dintre categoriile de mai jos.
Scopul este să alegi categoria cea mai relevantă pentru subiectul interogării.

**Interogarea utilizatorului:**
{query}

**Instrucțiuni:**
- **Categorie**: alege din lista de mai jos categoria care se potrivește cel mai bine cu intenția utilizatorului. Folosește descrierea fiecărei categorii ca ghid și alege o singură opțiune, scrisă exact ca în listă:
{categories}

**Formatul răspunsului:**
Răspunde cu un singur obiect JSON:
```json
{{
  "category": "Categorie"
}}
```"#
        ),
        Language::English => format!(
            r#"You are an assistant that analyses a query and maps its subject onto one of the categories below.
The goal is to pick the category the query's subject fits best.

**User query:**
{query}

**Instructions:**
- **Category**: choose the category from the list below that best matches the user's intent. Use each category's description as a guide and pick exactly one option, spelled exactly as listed:
{categories}

**Response format:**
Reply with a single JSON object:
```json
{{
  "category": "Category"
}}
```"#
        ),
    }
}

/// Prompt asking the model to answer `query` from the retrieved decisions.
pub fn synthesis(
    language: Language,
    query: &str,
    corpus: &str,
    citation_count: usize,
    recency_cutoff_year: u32,
) -> String {
    match language {
        Language::Romanian => format!(
            r#"Ești un asistent care răspunde la o întrebare folosind informații despre hotărâri ale consiliului local (HCL), furnizate în format JSON cu câmpurile "Categorie", "Explicație", "Rezumat".

**Întrebarea utilizatorului**: "{query}"

**Informații despre HCL-uri**:
{corpus}

Oferă un răspuns detaliat și structurat la întrebarea utilizatorului pe baza informațiilor de mai sus.

Instrucțiuni pentru răspuns:
1. **Reformulează întrebarea** în propriile tale cuvinte.
2. **Prezintă un răspuns structurat și detaliat**, în ordine cronologică, cu accent pe hotărârile recente (anul {recency_cutoff_year} și ulterior).
3. **Formulează concluziile** clar și concis, prin puncte sau paragrafe, acoperind complet întrebarea.
4. **La final**, listează cele mai relevante {citation_count} HCL-uri în formatul:
   - HCL: nr.[nr]/[an] împreună cu un JSON cu câmpurile "Categorie", "Explicație", "Rezumat".

Această listă ajută la verificarea corectitudinii informațiilor oferite."#
        ),
        Language::English => format!(
            r#"You are an assistant answering a question using information about local council decisions (HCLs), given as JSON with the fields "Category", "Explanation", "Summary".

**User question**: "{query}"

**HCL information**:
{corpus}

Give a detailed, structured answer to the user's question based on the information above.

Answer instructions:
1. **Restate the question** in your own words.
2. **Present a structured, detailed answer** in chronological order, emphasizing recent decisions (year {recency_cutoff_year} and later).
3. **State the conclusions** clearly and concisely, as bullet points or paragraphs, fully addressing the question.
4. **At the end**, list the {citation_count} most relevant HCLs in the format:
   - HCL: nr.[nr]/[year] together with a JSON object with the fields "Category", "Explanation", "Summary".

This list helps verify the accuracy of the information provided."#
        ),
    }
}

/// Prompt for the parking-regulation domain, whose records carry the
/// decision articles and their motivation instead of summaries.
pub fn timpark_synthesis(
    query: &str,
    corpus: &str,
    citation_count: usize,
    recency_cutoff_year: u32,
) -> String {
    format!(
        r#"Ești un asistent care răspunde la o întrebare folosind informații despre hotărâri ale consiliului local (HCL) privind sistemul de parcare Timpark, furnizate în formatul 'HCL: nr.[nr]/[an]', 'Articole:', 'Motivatie:'.

**Întrebarea utilizatorului**: "{query}"

**Informații despre HCL-uri**:
{corpus}

Instrucțiuni pentru răspuns:
1. **Reformulează întrebarea** în propriile tale cuvinte.
2. **Prezintă un răspuns structurat și detaliat**, în ordine cronologică, cu accent pe hotărârile recente (anul {recency_cutoff_year} și ulterior).
3. **Formulează concluziile** clar și concis, prin puncte sau paragrafe, acoperind complet întrebarea.
4. **La final**, listează cele mai relevante {citation_count} HCL-uri în formatul:
   - HCL: nr.[nr]/[an]

Această listă ajută la verificarea corectitudinii informațiilor oferite."#
    )
}

/// Fixed answer used when retrieval found nothing to synthesize from.
pub fn no_records(language: Language, query: &str) -> String {
    match language {
        Language::Romanian => format!(
            "**Răspuns**: Nu am găsit hotărâri ale consiliului local relevante pentru întrebarea \"{query}\". Reformulează întrebarea sau alege un alt subiect."
        ),
        Language::English => format!(
            "**Answer**: No local council decisions matching the question \"{query}\" were found. Try rephrasing the question or asking about another topic."
        ),
    }
}

/// Header labels prefixed to general answers.
pub fn category_heading(language: Language) -> &'static str {
    match language {
        Language::Romanian => "Categorie",
        Language::English => "Category",
    }
}

pub fn decisions_heading(language: Language) -> &'static str {
    match language {
        Language::Romanian => "HCL-uri din categorie",
        Language::English => "HCLs in this category",
    }
}

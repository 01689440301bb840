#![cfg(feature = "mysql_tests")]

//! Runs against the database configured in `.env`. It empties `temp_analise_correcao_humano`.

use importador_redacoes::config::DbConfig;
use importador_redacoes::pipeline::{run_import, ImportOptions, ImportOutcome};
use importador_redacoes::store::{open_connection, StagingStore};

fn essays_csv(n: usize) -> String {
    let mut csv =
        String::from("redacao_id,arquivo_nome_armazenamento,tema,redacao_texto,co_redacao_grade_id\n");
    for id in 1..=n {
        csv.push_str(&format!("{id},{id}.png,Tema {id},Texto {id},{}\n", id % 5));
    }
    csv
}

#[test]
fn import_replaces_table_contents() {
    let config = DbConfig::from_env().unwrap();
    let mut store = open_connection(&config).unwrap();
    let csv = essays_csv(1_234);

    for _ in 0..2 {
        let outcome =
            run_import(&mut store, csv.as_bytes(), "lote.csv", &ImportOptions::default()).unwrap();
        match outcome {
            ImportOutcome::Imported(summary) => assert_eq!(summary.rows_inserted(), 1_234),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.row_count().unwrap(), 1_234);
    }
}

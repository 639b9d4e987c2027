/// Paso de un caso de prueba generado
#[derive(Debug, Clone, PartialEq)]
pub struct TestStep {
    pub step: String,
    pub test_data: String,
    pub expected_result: String,
}

/// Caso de prueba generado por el modelo para una historia de usuario
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub title: String,
    pub objective: String,
    pub precondition: String,
    /// Identificador de la historia de usuario de origen
    pub coverage: String,
    pub status: String,
    pub steps: Vec<TestStep>,
}

/// Campos compartidos por todas las filas de un mismo caso de prueba
#[derive(Debug, Clone, PartialEq)]
pub struct CaseHeader {
    pub name: String,
    pub objective: String,
    pub precondition: String,
    pub coverage: String,
    pub status: String,
}

/// Fila de la hoja de salida: un paso de un caso de prueba.
///
/// `header` solo está presente en la primera fila de cada grupo; el resto de
/// filas del grupo comparten `group` y lo dejan vacío.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseRow {
    pub group: usize,
    pub header: Option<CaseHeader>,
    pub step: String,
    pub test_data: String,
    pub expected_result: String,
}

impl TestCase {
    pub fn header(&self) -> CaseHeader {
        CaseHeader {
            name: self.title.clone(),
            objective: self.objective.clone(),
            precondition: self.precondition.clone(),
            coverage: self.coverage.clone(),
            status: self.status.clone(),
        }
    }

    /// Convierte el caso en una fila por paso. Sin pasos no hay filas.
    pub fn to_rows(&self, group: usize) -> Vec<TestCaseRow> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| TestCaseRow {
                group,
                header: if i == 0 { Some(self.header()) } else { None },
                step: step.step.clone(),
                test_data: step.test_data.clone(),
                expected_result: step.expected_result.clone(),
            })
            .collect()
    }
}

/// Aplana los casos de prueba en filas. Cada caso con pasos recibe un grupo
/// consecutivo a partir de `first_group`; los casos sin pasos no consumen grupo,
/// así que el siguiente grupo libre es `first_group + group_count(test_cases)`.
pub fn flatten_test_cases(test_cases: &[TestCase], first_group: usize) -> Vec<TestCaseRow> {
    test_cases
        .iter()
        .filter(|test_case| !test_case.steps.is_empty())
        .enumerate()
        .flat_map(|(i, test_case)| test_case.to_rows(first_group + i))
        .collect()
}

/// Número de grupos de filas que producen los casos
pub fn group_count(test_cases: &[TestCase]) -> usize {
    test_cases
        .iter()
        .filter(|test_case| !test_case.steps.is_empty())
        .count()
}

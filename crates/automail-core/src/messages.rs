//! User-facing strings. The product UI is in Portuguese.

pub const UPLOAD_SUCCEEDED: &str = "Documento processado com sucesso!";
pub const UPLOAD_FAILED: &str = "Erro ao processar arquivo. Tente novamente.";
pub const NO_FILE_SELECTED: &str = "Por favor, selecione um arquivo antes de enviar.";
pub const FILE_TOO_LARGE: &str = "Arquivo muito grande. O tamanho máximo permitido é 20MB.";
pub const UNSUPPORTED_EXTENSION: &str = "Apenas PDF e TXT são aceitos";

pub const REPLY_COPIED: &str = "Resposta copiada para área de transferência!";
pub const COPIED: &str = "Copiado com sucesso!";
pub const COPY_REPLY: &str = "Copiar Resposta";
pub const COPY_FAILED: &str = "Não foi possível copiar a resposta.";

pub const NOT_CLASSIFIED: &str = "Não classificado";
pub const REPLY_NOT_GENERATED: &str = "Não gerada";
pub const NO_DOCUMENTS: &str = "Nenhum documento encontrado";
pub const NO_DOCUMENTS_HINT: &str = "Faça upload de um documento para começar";
pub const NO_PRODUCTIVE: &str = "Não há documentos produtivos";
pub const NO_UNPRODUCTIVE: &str = "Não há documentos improdutivos";

pub const CONFIRM_DELETE_ONE: &str = "Apagar este documento?";
pub const CONFIRM_DELETE_ONE_BODY: &str =
    "Esta ação não pode ser desfeita. Tem certeza que deseja excluir este documento?";
pub const CONFIRM_DELETE_ALL: &str = "Apagar todos os documentos?";
pub const CONFIRM_DELETE_ALL_BODY: &str =
    "Esta ação irá remover todos os documentos processados. Tem certeza que deseja continuar?";
pub const DELETE_FAILED: &str = "Erro ao excluir documento.";

pub const DOCUMENT_NOT_FOUND: &str = "Documento não encontrado.";
pub const LOAD_FAILED: &str = "Erro ao carregar documento.";

pub const APP_TITLE: &str = "AutoU Mail";
pub const HOME_PROMPT: &str = "Selecione uma das opções abaixo para continuar:";
pub const PROCESS_DOCUMENT: &str = "Processar Documento";
pub const VIEW_DOCUMENTS: &str = "Ver Documentos";
pub const SEND_ANOTHER: &str = "Enviar outro documento";
pub const VIEW_ALL: &str = "Ver todos os documentos";
pub const LIST_TITLE: &str = "Documentos Processados";
pub const EXTRACTED_TEXT: &str = "Texto Extraído";
pub const CLASSIFICATION: &str = "Classificação";
pub const AUTO_REPLY: &str = "Resposta Automática";
pub const PROCESSED_AT: &str = "Processado em";
pub const PROCESSING: &str = "Processando...";
pub const LOADING: &str = "Carregando...";
pub const DELETING: &str = "Apagando...";

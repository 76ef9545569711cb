mod docx;
mod html;
mod pdf;
mod rtf;
mod text;
